//! User-facing reply texts.
//!
//! Detail stays in the logs. Users only get guidance they can act on, or a
//! generic request to try again later.

use std::fmt::Write as _;

use crate::chart::NatalChart;
use crate::error::{ChartError, InputErrorKind};
use crate::interpret::InterpretationError;
use crate::pipeline::Outcome;

pub const GREETING_REPLY: &str = "こんにちは！無料でホロスコープを診断します。\
誕生年月日、出生時間（例: 1990-01-01 12:30）、そして出生地の都道府県と市区町村を教えてください。\
(例: 東京都, 港区)";

/// Sent as soon as birth data parses, before the chart is computed.
pub const ACKNOWLEDGEMENT: &str =
    "ご依頼ありがとうございます！ホロスコープの解釈を生成中です。少々お待ちください...";

pub const WRONG_SHAPE_REPLY: &str = "入力形式が正しくありません。例: 1990-01-01 12:30, 東京都, 港区";

pub const WRONG_DATE_TIME_REPLY: &str =
    "日付または時間の形式が正しくありません。例: 1990-01-01 12:30, 東京都, 港区";

pub const PLACE_NOT_FOUND_REPLY: &str =
    "出生地の座標を取得できませんでした。都道府県と市区町村が正しいかご確認ください。";

pub const CALCULATION_FAILED_REPLY: &str =
    "ホロスコープの計算中にエラーが発生しました。入力情報をご確認ください。";

pub const UNEXPECTED_ERROR_REPLY: &str =
    "ホロスコープの解釈中に予期せぬエラーが発生しました。時間を置いて再度お試しください。";

const RESULT_HEADER: &str = "ホロスコープ診断結果です：";

/// Reply text for a pipeline outcome.
pub fn reply_for(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Greeting => GREETING_REPLY.to_string(),
        Outcome::Reading {
            interpretation: Ok(text),
            ..
        } => format!("{RESULT_HEADER}\n{text}"),
        Outcome::Reading {
            chart,
            interpretation: Err(err),
        } => format!(
            "{RESULT_HEADER}\n{}\n{}",
            chart_summary(chart),
            interpretation_error_reply(err)
        ),
        Outcome::Rejected(err) => error_reply(err).to_string(),
    }
}

/// Reply text for a failed request.
pub fn error_reply(err: &ChartError) -> &'static str {
    match err {
        ChartError::MalformedInput { kind, .. } => match kind {
            InputErrorKind::WrongShape => WRONG_SHAPE_REPLY,
            InputErrorKind::InvalidDateTime => WRONG_DATE_TIME_REPLY,
        },
        ChartError::GeocodeNotFound { .. } => PLACE_NOT_FOUND_REPLY,
        ChartError::InvalidCoordinate { .. }
        | ChartError::InvalidTimestamp(_)
        | ChartError::CalculationError(_) => CALCULATION_FAILED_REPLY,
        ChartError::GeocoderUnavailable(_)
        | ChartError::EphemerisUnavailable(_)
        | ChartError::IncompleteChart { .. } => UNEXPECTED_ERROR_REPLY,
    }
}

pub fn interpretation_error_reply(err: &InterpretationError) -> &'static str {
    match err {
        InterpretationError::NotConfigured => {
            "ホロスコープの解釈は現在ご利用いただけません。天体位置のみお知らせします。"
        }
        InterpretationError::Timeout(_) => {
            "ホロスコープの解釈中にネットワークエラーが発生しました。AIからの応答がタイムアウトしました。時間を置いて再度お試しください。"
        }
        InterpretationError::RateLimited(_) => {
            "ホロスコープの解釈中にネットワークエラーが発生しました。APIの利用制限を超過しました。時間を置いて再度お試しください。"
        }
        InterpretationError::Forbidden(_) => {
            "ホロスコープの解釈中にネットワークエラーが発生しました。権限の問題の可能性があります。時間を置いて再度お試しください。"
        }
        InterpretationError::EmptyResponse => {
            "ホロスコープの解釈中にエラーが発生しました。AIからの応答がありませんでした。"
        }
        InterpretationError::Failed(_) => {
            "ホロスコープの解釈中にネットワークエラーが発生しました。時間を置いて再度お試しください。"
        }
    }
}

/// One line per chart point: label, sign and degree within the sign.
pub fn chart_summary(chart: &NatalChart) -> String {
    let mut summary = String::new();
    for entry in chart.entries() {
        let _ = write!(
            summary,
            "{}: {} {:.2}度",
            entry.point().label(),
            entry.sign.display_name(),
            entry.degree_in_sign
        );
        if entry.position.is_retrograde() {
            summary.push_str(" (逆行)");
        }
        summary.push('\n');
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_failures_get_specific_guidance() {
        let shape = ChartError::malformed(InputErrorKind::WrongShape, "x");
        let date = ChartError::malformed(InputErrorKind::InvalidDateTime, "x");
        assert_eq!(error_reply(&shape), WRONG_SHAPE_REPLY);
        assert_eq!(error_reply(&date), WRONG_DATE_TIME_REPLY);
    }

    #[test]
    fn test_internal_failures_stay_generic() {
        let err = ChartError::EphemerisUnavailable("/secret/path missing".to_string());
        let reply = reply_for(&Outcome::Rejected(err));
        assert_eq!(reply, UNEXPECTED_ERROR_REPLY);
        assert!(!reply.contains("/secret/path"));
    }
}
