//! Display locales and their text sets.
//!
//! Two locales are supported. Chinese is the primary (default) locale and
//! English the secondary one. A text set is selected as a whole, so a
//! rendered view never mixes strings from both.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage key holding the persisted locale token.
pub const LOCALE_STORAGE_KEY: &str = "pref-lang";

/// Project page the GitHub link points at.
pub const PROJECT_URL: &str = "https://github.com/malaohu/MobaXterm-GenKey";

/// Supported display locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Simplified Chinese (primary)
    #[default]
    Zh,
    /// English (secondary)
    En,
}

impl Locale {
    /// Token written to preference storage.
    pub fn token(&self) -> &'static str {
        match self {
            Locale::Zh => "zh",
            Locale::En => "en",
        }
    }

    /// Parse a stored token. Only the exact tokens are recognised.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "zh" => Some(Locale::Zh),
            "en" => Some(Locale::En),
            _ => None,
        }
    }

    /// The other supported locale.
    pub fn toggled(self) -> Self {
        match self {
            Locale::Zh => Locale::En,
            Locale::En => Locale::Zh,
        }
    }

    /// Text set for this locale.
    pub fn texts(&self) -> &'static Texts {
        match self {
            Locale::Zh => &ZH,
            Locale::En => &EN,
        }
    }

    /// Label of the toggle control: names the locale it switches to,
    /// written in that locale.
    pub fn toggle_label(&self) -> &'static str {
        match self {
            Locale::Zh => "English",
            Locale::En => "中文",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Every user-facing string of the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Texts {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub name_label: &'static str,
    pub name_placeholder: &'static str,
    pub version_label: &'static str,
    pub version_placeholder: &'static str,
    pub count_label: &'static str,
    pub count_placeholder: &'static str,
    pub generate_btn: &'static str,
    pub github_link: &'static str,
    pub success_msg: &'static str,
    pub error_msg: &'static str,
    pub professional: &'static str,
    pub security_note: &'static str,
}

static ZH: Texts = Texts {
    title: "MobaXterm 密钥生成器",
    subtitle: "为您的 MobaXterm 专业版生成许可证密钥",
    name_label: "用户名",
    name_placeholder: "输入授权用户名",
    version_label: "版本号",
    version_placeholder: "例如: 25.2",
    count_label: "用户数量",
    count_placeholder: "授权用户数",
    generate_btn: "生成并下载密钥",
    github_link: "在 GitHub 上查看",
    success_msg: "密钥生成成功，正在开始下载...",
    error_msg: "生成失败，请检查输入参数",
    professional: "专业版",
    security_note: "所有生成过程均在本地或安全服务器完成",
};

static EN: Texts = Texts {
    title: "MobaXterm Keygen",
    subtitle: "Generate license keys for MobaXterm Professional",
    name_label: "Username",
    name_placeholder: "Enter authorized username",
    version_label: "Version",
    version_placeholder: "e.g., 25.2",
    count_label: "User Count",
    count_placeholder: "Number of users",
    generate_btn: "Generate & Download",
    github_link: "View on GitHub",
    success_msg: "Key generated successfully, downloading...",
    error_msg: "Generation failed, please check inputs",
    professional: "Professional",
    security_note: "Generation is processed locally or on secure servers",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_is_an_involution() {
        for locale in [Locale::Zh, Locale::En] {
            assert_eq!(locale.toggled().toggled(), locale);
            assert_ne!(locale.toggled(), locale);
        }
    }

    #[test]
    fn tokens_parse_back() {
        assert_eq!(Locale::from_token("zh"), Some(Locale::Zh));
        assert_eq!(Locale::from_token("en"), Some(Locale::En));
        assert_eq!(Locale::from_token(Locale::En.token()), Some(Locale::En));
    }

    #[test]
    fn unknown_tokens_are_rejected() {
        assert_eq!(Locale::from_token(""), None);
        assert_eq!(Locale::from_token("EN"), None);
        assert_eq!(Locale::from_token("fr"), None);
    }

    #[test]
    fn default_is_chinese() {
        assert_eq!(Locale::default(), Locale::Zh);
        assert_eq!(Locale::default().texts().generate_btn, "生成并下载密钥");
    }

    #[test]
    fn toggle_label_names_the_other_locale() {
        assert_eq!(Locale::Zh.toggle_label(), "English");
        assert_eq!(Locale::En.toggle_label(), "中文");
    }
}
