//! # Messages
//!
//! Constant strings and format functions for user-facing replies.
//! The bot answers in Japanese.

pub const ERROR_GENERIC: &str = "エラーが発生しました。管理者にお問い合わせください。";

// ask
pub const ASK_DESCRIPTION: &str = "入力された文言をそのまま返します";
pub const ASK_OPTION_DESCRIPTION: &str = "返してほしい文言";
pub const MAX_QUESTION_LENGTH: usize = 200;
pub const ERROR_EMPTY_QUESTION: &str = "質問が入力されていません。もう一度お試しください。";

pub fn error_long_question() -> String {
    format!("質問が長すぎます。{MAX_QUESTION_LENGTH}文字以内で入力してください。")
}

// echo
pub fn echo_quote(mention: &str, content: &str) -> String {
    format!("{mention}\n> {content}")
}

// temperature
pub const TEMPERATURE_DESCRIPTION: &str = "現在の天気と気温を表示します。";
pub const ERROR_NO_WEATHER_TOKEN: &str =
    "APIキーが設定されていません。環境変数 `OPEN_WEATHER_API_TOKEN` を確認してください。";

pub fn weather_line(name: &str, description: &str, temp: f64) -> String {
    format!("- {name}：{description}（{temp}°C）\n")
}

pub fn weather_failed_line(name: &str) -> String {
    format!("{name}：データ取得に失敗しました。\n")
}
