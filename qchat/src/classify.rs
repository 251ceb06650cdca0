//! Maps raw failure descriptions onto short localized messages.
//!
//! Rules are tried in order and matched case-insensitively; the first rule
//! with any matching marker wins. Unmatched text passes through unchanged.
//!
//! ```rust
//! use qchat::{ErrorCategory, classify_error};
//!
//! assert_eq!(ErrorCategory::classify("Error: rate_limit_exceeded"), Some(ErrorCategory::RateLimited));
//! assert_eq!(classify_error("something odd"), "something odd");
//! ```

use qcommon::contains_any_ignore_case;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    InvalidApiKey,
    RateLimited,
    QuotaExhausted,
    Connectivity,
    ModelNotFound,
    ContextLengthExceeded,
    OutputTokenSetting,
}

const CLASSIFICATION_RULES: [(&[&str], ErrorCategory); 7] = [
    (
        &["invalid_api_key", "incorrect api key"],
        ErrorCategory::InvalidApiKey,
    ),
    (&["rate_limit"], ErrorCategory::RateLimited),
    (&["insufficient_quota"], ErrorCategory::QuotaExhausted),
    (&["connection"], ErrorCategory::Connectivity),
    (
        &["model_not_found", "does not exist"],
        ErrorCategory::ModelNotFound,
    ),
    (
        &["context_length_exceeded", "maximum context length"],
        ErrorCategory::ContextLengthExceeded,
    ),
    (
        &["max_tokens", "max_completion_tokens", "max_output_tokens"],
        ErrorCategory::OutputTokenSetting,
    ),
];

impl ErrorCategory {
    pub fn classify(raw: &str) -> Option<Self> {
        CLASSIFICATION_RULES
            .iter()
            .find(|(markers, _)| contains_any_ignore_case(raw, markers))
            .map(|(_, category)| *category)
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::InvalidApiKey => "APIキーが無効です",
            Self::RateLimited => "レート制限に達しました。しばらく待ってから再試行してください",
            Self::QuotaExhausted => "API利用枠が不足しています",
            Self::Connectivity => "接続エラー: インターネット接続を確認してください",
            Self::ModelNotFound => "指定されたモデルが見つかりません",
            Self::ContextLengthExceeded => "入力テキストが長すぎます",
            Self::OutputTokenSetting => "最大出力トークン数の設定に問題があります",
        }
    }
}

pub fn classify_error(raw: &str) -> String {
    match ErrorCategory::classify(raw) {
        Some(category) => category.message().to_string(),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_rule_maps_its_markers() {
        let cases = [
            ("Incorrect API key provided: sk-***", ErrorCategory::InvalidApiKey),
            ("code: invalid_api_key", ErrorCategory::InvalidApiKey),
            ("RATE_LIMIT_EXCEEDED", ErrorCategory::RateLimited),
            ("insufficient_quota: You exceeded your current quota", ErrorCategory::QuotaExhausted),
            ("connection error: tcp connect refused", ErrorCategory::Connectivity),
            ("The model `gpt-x` does not exist", ErrorCategory::ModelNotFound),
            ("model_not_found", ErrorCategory::ModelNotFound),
            ("This model's maximum context length is 8192 tokens", ErrorCategory::ContextLengthExceeded),
            ("max_output_tokens must be positive", ErrorCategory::OutputTokenSetting),
        ];

        for (raw, expected) in cases {
            assert_eq!(ErrorCategory::classify(raw), Some(expected), "{raw}");
        }
    }

    #[test]
    fn earlier_rules_win_over_later_ones() {
        assert_eq!(
            ErrorCategory::classify("invalid_api_key and rate_limit"),
            Some(ErrorCategory::InvalidApiKey)
        );
        assert_eq!(
            ErrorCategory::classify("context_length_exceeded: reduce max_tokens"),
            Some(ErrorCategory::ContextLengthExceeded)
        );
        assert_eq!(
            ErrorCategory::classify("connection reset while model_not_found"),
            Some(ErrorCategory::Connectivity)
        );
    }

    #[test]
    fn rate_limit_marker_anywhere_yields_rate_limit_message() {
        for raw in ["rate_limit", "xx Rate_Limit yy", "429 rate_limit_exceeded"] {
            assert_eq!(classify_error(raw), ErrorCategory::RateLimited.message());
        }
    }

    #[test]
    fn unmatched_text_is_returned_verbatim() {
        assert_eq!(classify_error(""), "");
        assert_eq!(classify_error("Unexpected EOF"), "Unexpected EOF");
    }
}
