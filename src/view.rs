//! Presented form surface.
//!
//! A renderer-agnostic description of what the user sees: three inputs, the
//! submit control and the locale toggle, all drawn from one text set.

use serde::Serialize;

use crate::controller::LoadingState;
use crate::form::{FormField, FormState, SeatBounds};
use crate::locale::{Locale, PROJECT_URL};

/// Kind of input widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Text,
    Number,
}

/// One input field with its native constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub field: FormField,
    pub id: &'static str,
    pub kind: InputKind,
    pub label: &'static str,
    pub placeholder: Option<&'static str>,
    pub required: bool,
    pub min: Option<u32>,
    pub max: Option<u32>,
    pub value: String,
}

/// The submit control. While busy it shows a spinner instead of a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitControl {
    pub label: Option<&'static str>,
    pub disabled: bool,
    pub busy: bool,
}

/// Full view model for one render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    pub locale: Locale,
    pub title: &'static str,
    pub subtitle: &'static str,
    /// Edition badge shown next to the title
    pub edition: &'static str,
    pub fields: Vec<FieldSpec>,
    pub submit: SubmitControl,
    pub toggle_label: &'static str,
    pub notice: Option<&'static str>,
    pub security_note: &'static str,
    pub github_link: &'static str,
    pub github_url: &'static str,
}

impl FormView {
    pub fn render(
        state: &FormState,
        locale: Locale,
        loading: LoadingState,
        notice: Option<&'static str>,
        bounds: SeatBounds,
    ) -> Self {
        let t = locale.texts();
        let busy = loading.is_loading();

        let fields = vec![
            FieldSpec {
                field: FormField::Name,
                id: FormField::Name.id(),
                kind: InputKind::Text,
                label: t.name_label,
                placeholder: Some(t.name_placeholder),
                required: true,
                min: None,
                max: None,
                value: state.name.clone(),
            },
            FieldSpec {
                field: FormField::Version,
                id: FormField::Version.id(),
                kind: InputKind::Text,
                label: t.version_label,
                placeholder: Some(t.version_placeholder),
                required: true,
                min: None,
                max: None,
                value: state.version.clone(),
            },
            FieldSpec {
                field: FormField::Count,
                id: FormField::Count.id(),
                kind: InputKind::Number,
                label: t.count_label,
                placeholder: Some(t.count_placeholder),
                required: true,
                min: Some(bounds.min),
                max: Some(bounds.max),
                value: state.seat_count.clone(),
            },
        ];

        Self {
            locale,
            title: t.title,
            subtitle: t.subtitle,
            edition: t.professional,
            fields,
            submit: SubmitControl {
                label: if busy { None } else { Some(t.generate_btn) },
                disabled: busy,
                busy,
            },
            toggle_label: locale.toggle_label(),
            notice,
            security_note: t.security_note,
            github_link: t.github_link,
            github_url: PROJECT_URL,
        }
    }

    pub fn field(&self, field: FormField) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.field == field)
    }
}
