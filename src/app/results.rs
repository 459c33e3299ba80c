use crate::upload::{ShortResult, ShortsClient, TaskId};
use crate::utils::format::{format_timestamp, round_seconds, score_percent};

/// Display data for one generated short.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultCard {
    pub index: usize,
    pub filename: String,
    pub score_percent: u32,
    pub duration_secs: u64,
    pub start: String,
    pub end: String,
    pub video_url: String,
    pub download_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResultsView {
    Empty,
    Cards(Vec<ResultCard>),
}

impl ResultsView {
    pub fn build(client: &ShortsClient, task_id: &TaskId, shorts: &[ShortResult]) -> Self {
        if shorts.is_empty() {
            return ResultsView::Empty;
        }

        let cards = shorts
            .iter()
            .enumerate()
            .map(|(i, short)| ResultCard {
                index: i + 1,
                filename: short.filename.clone(),
                score_percent: score_percent(short.score),
                duration_secs: round_seconds(short.duration),
                start: format_timestamp(short.start_time),
                end: format_timestamp(short.end_time),
                video_url: client.output_url(task_id, &short.filename),
                download_url: client.download_url(task_id, &short.filename),
            })
            .collect();

        ResultsView::Cards(cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    fn client() -> ShortsClient {
        ShortsClient::new(&ClientConfig::default()).unwrap()
    }

    fn short(filename: &str, score: f64, start: f64, end: f64) -> ShortResult {
        ShortResult {
            filename: filename.to_string(),
            score,
            duration: end - start,
            start_time: start,
            end_time: end,
        }
    }

    #[test]
    fn test_one_card_per_short() {
        let shorts = vec![
            short("short_1.mp4", 0.912, 12.0, 41.6),
            short("short_2.mp4", 0.455, 75.2, 100.0),
            short("short_3.mp4", 0.3, 130.0, 140.4),
        ];
        let task = TaskId::new("t-9");

        let ResultsView::Cards(cards) = ResultsView::build(&client(), &task, &shorts) else {
            panic!("expected cards");
        };

        assert_eq!(cards.len(), shorts.len());
        for (card, short) in cards.iter().zip(&shorts) {
            assert_eq!(card.filename, short.filename);
            assert_eq!(card.score_percent, (short.score * 100.0).round() as u32);
            assert_eq!(card.duration_secs, short.duration.round() as u64);
        }
        assert_eq!(cards[0].score_percent, 91);
        assert_eq!(cards[0].duration_secs, 30);
        assert_eq!(cards[1].start, "1:15");
        assert_eq!(cards[2].index, 3);
        assert_eq!(
            cards[1].video_url,
            "http://localhost:8080/outputs/t-9/short_2.mp4"
        );
        assert!(cards[1].download_url.ends_with("short_2.mp4?download=true"));
    }

    #[test]
    fn test_empty_results_use_placeholder() {
        let view = ResultsView::build(&client(), &TaskId::new("t"), &[]);
        assert_eq!(view, ResultsView::Empty);
    }
}
