use livequery_api::{
    ChartResult, ChartSeries, ChartSettings, ComponentResultRequest, ComponentSettings,
    ComponentStatus, ResultComponent, ResultData,
};
use tracing::{debug, warn};

pub const KIND: &str = "chart";

/// Visualisation fed from aggregated search results.
#[derive(Debug, Clone)]
pub struct ChartComponent {
    id: String,
    settings: ChartSettings,
    wants_data: bool,
    searching: bool,
    data: Option<ChartResult>,
}

impl ChartComponent {
    #[must_use]
    pub fn new(id: impl Into<String>, settings: ChartSettings) -> Self {
        Self {
            id: id.into(),
            settings,
            wants_data: false,
            searching: false,
            data: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn series(&self) -> &[ChartSeries] {
        self.data
            .as_ref()
            .map(|data| data.series.as_slice())
            .unwrap_or_default()
    }

    pub fn point_count(&self) -> usize {
        self.series().iter().map(|series| series.points.len()).sum()
    }

    pub fn wants_data(&self) -> bool {
        self.wants_data
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }
}

impl ResultComponent for ChartComponent {
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
    }

    fn set_data(&mut self, data: ResultData) {
        match data {
            ResultData::Chart(chart) if self.wants_data => {
                debug!(component = %self.id, series = chart.series.len(), "chart data received");
                self.data = Some(chart);
            }
            ResultData::Chart(_) => {}
            other => {
                warn!(component = %self.id, kind = other.kind(), "ignoring non-chart data");
            }
        }
    }

    fn settings(&self) -> ComponentSettings {
        ComponentSettings::Chart(self.settings.clone())
    }

    // Charts always redraw from the full series, so no range or groups.
    fn result_request(&self) -> ComponentResultRequest {
        ComponentResultRequest {
            settings: self.settings(),
            range: None,
            open_groups: Vec::new(),
            fetch_data: self.wants_data,
        }
    }

    fn status(&self) -> ComponentStatus {
        ComponentStatus {
            kind: KIND,
            wants_data: self.wants_data,
            searching: self.searching,
            items: self.point_count() as u64,
            total: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart() -> ChartComponent {
        ChartComponent::new(
            "chart1",
            ChartSettings {
                visualisation: "bar".into(),
                fields: vec!["UserId".into()],
                max_values: vec![20],
            },
        )
    }

    fn series() -> ResultData {
        ResultData::Chart(ChartResult {
            series: vec![
                ChartSeries {
                    name: "count".into(),
                    points: vec![("alice".into(), 3.0), ("bob".into(), 1.0)],
                },
                ChartSeries {
                    name: "bytes".into(),
                    points: vec![("alice".into(), 512.0)],
                },
            ],
        })
    }

    #[test]
    fn counts_points_across_series() {
        let mut chart = chart();
        chart.set_wants_data(true);
        chart.set_data(series());
        assert_eq!(chart.series().len(), 2);
        assert_eq!(chart.point_count(), 3);
        assert_eq!(chart.status().items, 3);
    }

    #[test]
    fn paused_chart_keeps_previous_series() {
        let mut chart = chart();
        chart.set_wants_data(true);
        chart.set_data(series());
        chart.set_wants_data(false);
        chart.set_data(ResultData::Chart(ChartResult::default()));
        assert_eq!(chart.point_count(), 3);
    }

    #[test]
    fn request_has_no_range() {
        let chart = chart();
        let request = chart.result_request();
        assert!(request.range.is_none());
        assert!(request.open_groups.is_empty());
        assert_eq!(request.settings.kind(), KIND);
    }
}
