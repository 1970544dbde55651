//! Score breakdown of a completed assessment.

use egui::{Context, ProgressBar, RichText, Ui, Window};
use portal_business::portal::AssignedProduct;

pub const OVERALL_SCORE_LABEL: &str = "Overall Score";
pub const NO_SCORE_MESSAGE: &str = "No score data available for this assessment.";
pub const CLOSE_LABEL: &str = "Close";

const SCORE_WINDOW_WIDTH: f32 = 380.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreWindow {
    title: String,
    score: Option<f64>,
    values: Vec<(String, f64)>,
}

impl ScoreWindow {
    pub fn new(assessment: &AssignedProduct) -> Self {
        Self {
            title: format!("{} Results", assessment.display_assessment()),
            score: assessment.score,
            values: assessment.value_rows(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn has_scores(&self) -> bool {
        self.score.is_some() || !self.values.is_empty()
    }

    /// Shows the window. Returns `false` once the user closed it.
    pub fn show(&self, ctx: &Context) -> bool {
        let mut open = true;
        let mut close = false;
        Window::new(self.title.as_str())
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .default_width(SCORE_WINDOW_WIDTH)
            .show(ctx, |ui| {
                if self.has_scores() {
                    if let Some(score) = self.score {
                        score_bar(ui, OVERALL_SCORE_LABEL, score, true);
                    }
                    for (label, value) in &self.values {
                        score_bar(ui, label, *value, false);
                    }
                } else {
                    ui.weak(NO_SCORE_MESSAGE);
                }
                ui.separator();
                close = ui.button(CLOSE_LABEL).clicked();
            });
        open && !close
    }
}

fn score_bar(ui: &mut Ui, label: &str, percent: f64, strong: bool) {
    let percent = percent.clamp(0.0, 100.0);
    let text = if strong {
        RichText::new(label).strong()
    } else {
        RichText::new(label)
    };
    ui.label(text);
    ui.add(ProgressBar::new((percent / 100.0) as f32).text(format!("{percent:.0}%")));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn window_lists_humanized_measures() {
        let assessment: AssignedProduct = serde_json::from_value(json!({
            "_id": "a1",
            "assessmentName": "Memory Check",
            "status": "COMPLETED",
            "score": 72.0,
            "values": { "shortTermMemory": 80.0, "focus": 64.0 }
        }))
        .unwrap();

        let window = ScoreWindow::new(&assessment);

        assert_eq!(window.title(), "Memory Check Results");
        assert!(window.has_scores());
        assert_eq!(
            window.values,
            vec![
                ("Focus".to_owned(), 64.0),
                ("Short Term Memory".to_owned(), 80.0)
            ]
        );
    }

    #[test]
    fn window_without_scores_is_empty() {
        let assessment: AssignedProduct = serde_json::from_value(json!({
            "_id": "a2",
            "assessmentName": "Vision",
            "status": "COMPLETED"
        }))
        .unwrap();

        assert!(!ScoreWindow::new(&assessment).has_scores());
    }
}
