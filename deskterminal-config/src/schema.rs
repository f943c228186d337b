//! Declarative description of the settings record.
//!
//! [`SCHEMA`] lists every field in declaration order together with its
//! semantic type and accessors. The ini codec and the settings editor are
//! both folds over this list, so a new entry here shows up in the file and
//! in the editor without touching either.

use crate::color::Color;
use crate::settings::Settings;
use std::path::PathBuf;

/// Semantic type of a settings field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Int,
    Bool,
    Text,
    Path,
    Color,
}

/// Extra constraint checked before a value is accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    None,
    /// Integer must be strictly greater than zero
    Positive,
}

/// A field value, tagged with its semantic type.
///
/// `Path` and `Color` carry an `Option` because some fields of those types
/// may be unset; unset values are never written to the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Int(i32),
    Bool(bool),
    Text(String),
    Path(Option<PathBuf>),
    Color(Option<Color>),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Int(_) => FieldKind::Int,
            FieldValue::Bool(_) => FieldKind::Bool,
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Path(_) => FieldKind::Path,
            FieldValue::Color(_) => FieldKind::Color,
        }
    }

    /// Render the value the way it appears after `key=` in the file.
    ///
    /// Returns `None` for unset values.
    pub fn to_file_string(&self) -> Option<String> {
        match self {
            FieldValue::Int(v) => Some(v.to_string()),
            FieldValue::Bool(v) => Some(v.to_string()),
            FieldValue::Text(v) => Some(v.clone()),
            FieldValue::Path(v) => v.as_ref().map(|p| p.display().to_string()),
            FieldValue::Color(v) => v.as_ref().map(Color::to_string),
        }
    }

    /// Parse the text after `key=` as a value of `kind`.
    ///
    /// Surrounding whitespace is ignored except for `Text`, which is taken
    /// verbatim so commands and font names keep their spaces.
    pub fn parse(kind: FieldKind, raw: &str) -> Option<FieldValue> {
        let text = raw.trim();
        match kind {
            FieldKind::Int => text.parse().ok().map(FieldValue::Int),
            FieldKind::Bool => match text {
                "true" => Some(FieldValue::Bool(true)),
                "false" => Some(FieldValue::Bool(false)),
                _ => None,
            },
            FieldKind::Text => Some(FieldValue::Text(raw.to_string())),
            FieldKind::Path if text.is_empty() => None,
            FieldKind::Path => Some(FieldValue::Path(Some(PathBuf::from(text)))),
            FieldKind::Color => Color::parse(text).map(|c| FieldValue::Color(Some(c))),
        }
    }
}

/// Rust types that can back a settings field
pub trait FieldType: Sized {
    const KIND: FieldKind;
    const NULLABLE: bool = false;

    fn to_value(&self) -> FieldValue;
    fn from_value(value: FieldValue) -> Option<Self>;
}

impl FieldType for i32 {
    const KIND: FieldKind = FieldKind::Int;

    fn to_value(&self) -> FieldValue {
        FieldValue::Int(*self)
    }

    fn from_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Int(v) => Some(v),
            _ => None,
        }
    }
}

impl FieldType for bool {
    const KIND: FieldKind = FieldKind::Bool;

    fn to_value(&self) -> FieldValue {
        FieldValue::Bool(*self)
    }

    fn from_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Bool(v) => Some(v),
            _ => None,
        }
    }
}

impl FieldType for String {
    const KIND: FieldKind = FieldKind::Text;

    fn to_value(&self) -> FieldValue {
        FieldValue::Text(self.clone())
    }

    fn from_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl FieldType for Option<PathBuf> {
    const KIND: FieldKind = FieldKind::Path;
    const NULLABLE: bool = true;

    fn to_value(&self) -> FieldValue {
        FieldValue::Path(self.clone())
    }

    fn from_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Path(v) => Some(v),
            _ => None,
        }
    }
}

impl FieldType for Color {
    const KIND: FieldKind = FieldKind::Color;

    fn to_value(&self) -> FieldValue {
        FieldValue::Color(Some(*self))
    }

    fn from_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Color(v) => v,
            _ => None,
        }
    }
}

impl FieldType for Option<Color> {
    const KIND: FieldKind = FieldKind::Color;
    const NULLABLE: bool = true;

    fn to_value(&self) -> FieldValue {
        FieldValue::Color(*self)
    }

    fn from_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Color(v) => Some(v),
            _ => None,
        }
    }
}

/// One entry of the settings schema
pub struct FieldDescriptor {
    /// Key used in the settings file and label used in the editor
    pub name: &'static str,
    pub kind: FieldKind,
    /// Whether the field may hold an unset value
    pub nullable: bool,
    pub constraint: Constraint,
    get: fn(&Settings) -> FieldValue,
    set: fn(&mut Settings, FieldValue) -> bool,
}

impl FieldDescriptor {
    pub fn get(&self, settings: &Settings) -> FieldValue {
        (self.get)(settings)
    }

    /// Store `value` into the field.
    ///
    /// Returns `false` and leaves the record untouched when the value has
    /// the wrong type, violates the field constraint, or is unset on a field
    /// that is not nullable.
    pub fn set(&self, settings: &mut Settings, value: FieldValue) -> bool {
        if !self.accepts(&value) {
            return false;
        }
        (self.set)(settings, value)
    }

    pub fn accepts(&self, value: &FieldValue) -> bool {
        if value.kind() != self.kind {
            return false;
        }
        match (self.constraint, value) {
            (Constraint::Positive, FieldValue::Int(v)) if *v <= 0 => false,
            (_, FieldValue::Path(None) | FieldValue::Color(None)) => self.nullable,
            _ => true,
        }
    }

    /// Parse `text` and store it, as done for a line of the settings file
    /// or a keystroke in an editor text field.
    pub fn set_from_str(&self, settings: &mut Settings, text: &str) -> bool {
        match FieldValue::parse(self.kind, text) {
            Some(value) => self.set(settings, value),
            None => false,
        }
    }
}

impl std::fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("nullable", &self.nullable)
            .field("constraint", &self.constraint)
            .finish()
    }
}

macro_rules! field {
    ($name:literal, $field:ident: $ty:ty) => {
        field!($name, $field: $ty, Constraint::None)
    };
    ($name:literal, $field:ident: $ty:ty, $constraint:expr) => {
        FieldDescriptor {
            name: $name,
            kind: <$ty as FieldType>::KIND,
            nullable: <$ty as FieldType>::NULLABLE,
            constraint: $constraint,
            get: |s| FieldType::to_value(&s.$field),
            set: |s, v| match <$ty as FieldType>::from_value(v) {
                Some(v) => {
                    s.$field = v;
                    true
                }
                None => false,
            },
        }
    };
}

/// All settings fields in declaration order
pub static SCHEMA: &[FieldDescriptor] = &[
    field!("x", x: i32),
    field!("y", y: i32),
    field!("width", width: i32, Constraint::Positive),
    field!("height", height: i32, Constraint::Positive),
    field!("fontSize", font_size: i32, Constraint::Positive),
    field!("exitOnExit", exit_on_exit: bool),
    field!("command", command: String),
    field!("fontFamily", font_family: String),
    field!("initialDirectory", initial_directory: Option<PathBuf>),
    field!("backgroundColor", background_color: Color),
    field!("foregroundColor", foreground_color: Color),
    field!("selectionBackground", selection_background: Color),
    field!("selectionForeground", selection_foreground: Option<Color>),
    field!("black", black: Color),
    field!("red", red: Color),
    field!("green", green: Color),
    field!("yellow", yellow: Color),
    field!("blue", blue: Color),
    field!("magenta", magenta: Color),
    field!("cyan", cyan: Color),
    field!("white", white: Color),
    field!("brightBlack", bright_black: Color),
    field!("brightRed", bright_red: Color),
    field!("brightGreen", bright_green: Color),
    field!("brightYellow", bright_yellow: Color),
    field!("brightBlue", bright_blue: Color),
    field!("brightMagenta", bright_magenta: Color),
    field!("brightCyan", bright_cyan: Color),
    field!("brightWhite", bright_white: Color),
];

/// Look up a field by its file key
pub fn field(name: &str) -> Option<&'static FieldDescriptor> {
    SCHEMA.iter().find(|f| f.name == name)
}
