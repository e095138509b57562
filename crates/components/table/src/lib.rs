use livequery_api::{
    ComponentResultRequest, ComponentSettings, ComponentStatus, OffsetRange, ResultComponent,
    ResultData, TableResult, TableRow, TableSettings,
};
use tracing::{debug, warn};

pub const KIND: &str = "table";
const DEFAULT_PAGE_SIZE: u64 = 100;

/// Paged, optionally grouped table of search results.
#[derive(Debug, Clone)]
pub struct TableComponent {
    id: String,
    settings: TableSettings,
    range: OffsetRange,
    open_groups: Vec<String>,
    wants_data: bool,
    searching: bool,
    data: Option<TableResult>,
}

impl TableComponent {
    #[must_use]
    pub fn new(id: impl Into<String>, settings: TableSettings) -> Self {
        Self {
            id: id.into(),
            settings,
            range: OffsetRange::new(0, DEFAULT_PAGE_SIZE),
            open_groups: Vec::new(),
            wants_data: false,
            searching: false,
            data: None,
        }
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.range.length = page_size.max(1);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Move to the page starting at `offset`. Takes effect on the next poll.
    pub fn set_offset(&mut self, offset: u64) {
        self.range.offset = offset;
    }

    /// Expand a collapsed group, or collapse an expanded one.
    pub fn toggle_group(&mut self, group_key: impl Into<String>) {
        let group_key = group_key.into();
        if let Some(pos) = self.open_groups.iter().position(|key| *key == group_key) {
            self.open_groups.remove(pos);
        } else {
            self.open_groups.push(group_key);
        }
    }

    pub fn rows(&self) -> &[TableRow] {
        self.data
            .as_ref()
            .map(|data| data.rows.as_slice())
            .unwrap_or_default()
    }

    pub fn total_results(&self) -> Option<u64> {
        self.data.as_ref().map(|data| data.total_results)
    }

    pub fn wants_data(&self) -> bool {
        self.wants_data
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }
}

impl ResultComponent for TableComponent {
    fn set_wants_data(&mut self, wants_data: bool) {
        self.wants_data = wants_data;
    }

    fn start_search(&mut self) {
        self.searching = true;
    }

    fn end_search(&mut self) {
        self.searching = false;
    }

    fn reset(&mut self) {
        self.data = None;
        self.range.offset = 0;
    }

    fn set_data(&mut self, data: ResultData) {
        match data {
            ResultData::Table(table) if self.wants_data => {
                debug!(component = %self.id, rows = table.rows.len(), "table data received");
                self.data = Some(table);
            }
            ResultData::Table(_) => {
                debug!(component = %self.id, "table not accepting data, dropping rows");
            }
            other => {
                warn!(component = %self.id, kind = other.kind(), "ignoring non-table data");
            }
        }
    }

    fn settings(&self) -> ComponentSettings {
        ComponentSettings::Table(self.settings.clone())
    }

    fn result_request(&self) -> ComponentResultRequest {
        ComponentResultRequest {
            settings: self.settings(),
            range: Some(self.range),
            open_groups: self.open_groups.clone(),
            fetch_data: self.wants_data,
        }
    }

    fn status(&self) -> ComponentStatus {
        ComponentStatus {
            kind: KIND,
            wants_data: self.wants_data,
            searching: self.searching,
            items: self.rows().len() as u64,
            total: self.total_results(),
        }
    }
}
