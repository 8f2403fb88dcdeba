use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestBuildError {
    #[error("form control `{}` is missing", .0.name())]
    MissingControl(FormField),
}

/// Generation parameters sent with every upload, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Theme,
    Tone,
    Platform,
    Length,
    Language,
    ContentFormat,
    TargetEmotion,
    CallToAction,
    EffectIntensity,
}

impl FormField {
    pub const ALL: [FormField; 9] = [
        FormField::Theme,
        FormField::Tone,
        FormField::Platform,
        FormField::Length,
        FormField::Language,
        FormField::ContentFormat,
        FormField::TargetEmotion,
        FormField::CallToAction,
        FormField::EffectIntensity,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            FormField::Theme => "theme",
            FormField::Tone => "tone",
            FormField::Platform => "platform",
            FormField::Length => "length",
            FormField::Language => "language",
            FormField::ContentFormat => "content_format",
            FormField::TargetEmotion => "target_emotion",
            FormField::CallToAction => "call_to_action",
            FormField::EffectIntensity => "effect_intensity",
        }
    }
}

/// Something that exposes the current value of each form control.
///
/// `None` means the control does not exist at all; an empty control yields
/// `Some(String::new())`.
pub trait FormSource {
    fn control_value(&self, field: FormField) -> Option<String>;
}

impl FormSource for HashMap<String, String> {
    fn control_value(&self, field: FormField) -> Option<String> {
        self.get(field.name()).cloned()
    }
}

impl FormSource for BTreeMap<String, String> {
    fn control_value(&self, field: FormField) -> Option<String> {
        self.get(field.name()).cloned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormParameters {
    values: Vec<(FormField, String)>,
}

impl FormParameters {
    /// Reads all nine controls. Fails on the first control that is missing.
    pub fn read<S: FormSource + ?Sized>(source: &S) -> Result<Self, RequestBuildError> {
        let values = FormField::ALL
            .iter()
            .map(|field| {
                source
                    .control_value(*field)
                    .map(|value| (*field, value))
                    .ok_or(RequestBuildError::MissingControl(*field))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { values })
    }

    pub fn get(&self, field: FormField) -> &str {
        self.values
            .iter()
            .find(|(candidate, _)| *candidate == field)
            .map(|(_, value)| value.as_str())
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.values
            .iter()
            .map(|(field, value)| (field.name(), value.as_str()))
    }
}
