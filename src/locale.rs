//! User-facing text: form error messages, boolean labels, placeholders.

use crate::error::{DeniedAction, FormErrorKind};
use std::str::FromStr;

/// Locale for every string the builder puts in front of an end user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "en-us" | "en_us" => Ok(Locale::En),
            "zh" | "zh-cn" | "zh_cn" => Ok(Locale::Zh),
            other => Err(format!("unsupported locale: {} (expected en or zh)", other)),
        }
    }
}

impl Locale {
    /// Locale from env `FORMS_LOCALE`, default `en`. Unknown values fall back to the default.
    pub fn from_env() -> Self {
        match std::env::var("FORMS_LOCALE") {
            Ok(v) => v.parse().unwrap_or_else(|e: String| {
                tracing::warn!("{}, using en", e);
                Locale::En
            }),
            Err(_) => Locale::En,
        }
    }

    pub fn form_error(&self, kind: FormErrorKind) -> &'static str {
        match (self, kind) {
            (Locale::En, FormErrorKind::PermissionDenied(DeniedAction::CreateDetail)) => {
                "You do not have permission to add details to this record"
            }
            (Locale::En, FormErrorKind::PermissionDenied(DeniedAction::Create)) => {
                "You do not have permission to create this record"
            }
            (Locale::En, FormErrorKind::PermissionDenied(DeniedAction::Read)) => {
                "You do not have permission to read this record"
            }
            (Locale::En, FormErrorKind::PermissionDenied(DeniedAction::Update)) => {
                "You do not have permission to edit this record"
            }
            (Locale::En, FormErrorKind::NotConfigured) => {
                "This form layout is not configured yet, please configure it first"
            }
            (Locale::En, FormErrorKind::RecordUnavailable) => {
                "This record has been deleted, or you do not have permission to read it"
            }
            (Locale::Zh, FormErrorKind::PermissionDenied(DeniedAction::CreateDetail)) => {
                "你没有权限向此记录添加明细"
            }
            (Locale::Zh, FormErrorKind::PermissionDenied(DeniedAction::Create)) => "没有新建权限",
            (Locale::Zh, FormErrorKind::PermissionDenied(DeniedAction::Read)) => "你没有读取此记录的权限",
            (Locale::Zh, FormErrorKind::PermissionDenied(DeniedAction::Update)) => "你没有编辑此记录的权限",
            (Locale::Zh, FormErrorKind::NotConfigured) => "此表单布局尚未配置，请配置后使用",
            (Locale::Zh, FormErrorKind::RecordUnavailable) => "此记录已被删除，或你对此记录没有读取权限",
        }
    }

    pub fn bool_text(&self, b: bool) -> &'static str {
        match (self, b) {
            (Locale::En, true) => "Yes",
            (Locale::En, false) => "No",
            (Locale::Zh, true) => "是",
            (Locale::Zh, false) => "否",
        }
    }

    /// Shown as the initial value of an auto-sequence field on a new record.
    pub fn series_placeholder(&self) -> &'static str {
        match self {
            Locale::En => "Auto value (shown after save)",
            Locale::Zh => "自动值 (保存后显示)",
        }
    }
}
