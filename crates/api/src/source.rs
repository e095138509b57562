use crate::types::DocRef;

/// Supplies the data source currently loaded for the query view.
pub trait DataSourceLoader {
    /// `None` until a data source has been chosen and loaded.
    fn loaded_data_source(&self) -> Option<DocRef>;
}

/// A loader whose data source is fixed up front.
#[derive(Debug, Clone, Default)]
pub struct StaticDataSource {
    data_source: Option<DocRef>,
}

impl StaticDataSource {
    #[must_use]
    pub fn new(data_source: DocRef) -> Self {
        Self {
            data_source: Some(data_source),
        }
    }

    /// A loader with nothing loaded.
    #[must_use]
    pub fn unloaded() -> Self {
        Self::default()
    }

    pub fn set(&mut self, data_source: Option<DocRef>) {
        self.data_source = data_source;
    }
}

impl DataSourceLoader for StaticDataSource {
    fn loaded_data_source(&self) -> Option<DocRef> {
        self.data_source.clone()
    }
}
