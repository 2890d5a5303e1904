use std::sync::Arc;

use fusha_core::gate::{self, GrammarTable, TableAccess};

use crate::progress_service::ProgressService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrammarTableView {
    pub table: GrammarTable,
    pub access: TableAccess,
}

/// Lock state of the grammar reference tables for the current user.
pub struct GrammarReferenceService {
    progress: Arc<ProgressService>,
}

impl GrammarReferenceService {
    #[must_use]
    pub fn new(progress: Arc<ProgressService>) -> Self {
        Self { progress }
    }

    pub async fn advanced_unlocked(&self) -> bool {
        self.progress.is_completed(&gate::gate_lesson()).await
    }

    pub async fn tables(&self) -> Vec<GrammarTableView> {
        let unlocked = self.advanced_unlocked().await;
        GrammarTable::ALL
            .into_iter()
            .map(|table| GrammarTableView {
                table,
                access: table.access(unlocked),
            })
            .collect()
    }
}
