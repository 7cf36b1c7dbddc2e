// src/output/types.rs
//! Plans and reports for delivering a rendered site map.

use std::path::PathBuf;

/// Where the rendered site map goes, in order.
#[derive(Debug, Clone, Default)]
pub struct OutputPlan {
    pub operations: Vec<DeliveryTarget>,
}

impl OutputPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_operation(mut self, operation: DeliveryTarget) -> Self {
        self.operations.push(operation);
        self
    }

    /// Writes to `path` when given, else prints to stdout.
    pub fn for_destination(path: Option<PathBuf>, content: String) -> Self {
        let operation = match path {
            Some(path) => DeliveryTarget::WriteFile { path, content },
            None => DeliveryTarget::PrintToStdout { content },
        };
        Self::new().with_operation(operation)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryTarget {
    WriteFile { path: PathBuf, content: String },
    PrintToStdout { content: String },
}

/// Outcome of executing an [`OutputPlan`].
#[derive(Debug, Clone, Default)]
pub struct OutputReport {
    pub completed: Vec<CompletedOperation>,
    pub failed: Vec<FailedOperation>,
    pub bytes_written: usize,
    pub total_duration_ms: u64,
}

impl OutputReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_completed(mut self, operation: CompletedOperation) -> Self {
        self.bytes_written += operation.bytes_written;
        self.completed.push(operation);
        self
    }

    pub fn with_failed(mut self, operation: FailedOperation) -> Self {
        self.failed.push(operation);
        self
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Files written by the plan.
    pub fn written_files(&self) -> impl Iterator<Item = &PathBuf> {
        self.completed.iter().filter_map(|done| match &done.operation {
            DeliveryTarget::WriteFile { path, .. } => Some(path),
            DeliveryTarget::PrintToStdout { .. } => None,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CompletedOperation {
    pub operation: DeliveryTarget,
    pub bytes_written: usize,
}

#[derive(Debug, Clone)]
pub struct FailedOperation {
    pub operation: DeliveryTarget,
    pub error: String,
}
