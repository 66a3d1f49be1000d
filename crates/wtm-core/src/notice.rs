//! Operator-facing notices emitted by the workflows

/// Sink for messages the operator should see while a workflow runs.
pub trait Notices {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
}

/// Discards every notice.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotices;

impl Notices for SilentNotices {
    fn info(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
}
