//! `key=value` codec for the settings file.

use crate::schema::{FieldKind, SCHEMA, field};
use crate::settings::Settings;

/// Serialize `settings` in schema order.
///
/// Unset values are omitted. A blank line separates runs of fields whose
/// type differs from the previously written field.
pub fn to_ini(settings: &Settings) -> String {
    let mut out = String::new();
    let mut previous_kind: Option<FieldKind> = None;

    for descriptor in SCHEMA {
        let Some(value) = descriptor.get(settings).to_file_string() else {
            continue;
        };
        if previous_kind.is_some_and(|kind| kind != descriptor.kind) {
            out.push('\n');
        }
        previous_kind = Some(descriptor.kind);

        out.push_str(descriptor.name);
        out.push('=');
        out.push_str(&value);
        out.push('\n');
    }

    out
}

/// Parse settings file contents on top of the defaults.
pub fn from_ini(text: &str) -> Settings {
    let mut settings = Settings::default();
    apply_ini(text, &mut settings);
    settings
}

/// Apply every well-formed line of `text` to `settings`.
///
/// Blank lines and `#`/`!` comments are skipped, as are lines without `=`,
/// unknown keys and values that fail to parse. Keys are trimmed; the value
/// is everything after the first `=`, so text fields round-trip exactly.
/// Returns the number of lines that were applied.
pub fn apply_ini(text: &str, settings: &mut Settings) -> usize {
    let mut applied = 0;

    for (number, line) in text.lines().enumerate() {
        let line = line.trim_start();
        if line.trim_end().is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            log::debug!("settings line {}: no '=' separator, skipped", number + 1);
            continue;
        };
        let key = key.trim();

        let Some(descriptor) = field(key) else {
            log::debug!("settings line {}: unknown key {:?}", number + 1, key);
            continue;
        };

        if descriptor.set_from_str(settings, value) {
            applied += 1;
        } else {
            log::warn!(
                "settings line {}: invalid value {:?} for {}, keeping previous value",
                number + 1,
                value.trim(),
                key
            );
        }
    }

    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use std::path::PathBuf;

    #[test]
    fn defaults_serialize_in_groups() {
        let mut settings = Settings::default();
        settings.command = "powershell.exe".to_string();
        let text = to_ini(&settings);

        assert!(text.starts_with("x=0\ny=0\nwidth=600\nheight=800\nfontSize=14\n\nexitOnExit=false\n\ncommand=powershell.exe\nfontFamily=Consolas\n\nbackgroundColor=rgba(0,0,0,1)\n"));
        assert!(text.contains("foregroundColor=rgba(255,255,255,255)\n"));
        assert!(!text.contains("initialDirectory"));
        assert!(!text.contains("selectionForeground"));
        assert!(!text.contains("\n\n\n"));
        assert!(text.ends_with("brightWhite=rgba(255,255,255,255)\n"));
    }

    #[test]
    fn set_path_gets_its_own_group() {
        let settings = Settings {
            initial_directory: Some(PathBuf::from("/home/user")),
            ..Settings::default()
        };
        let text = to_ini(&settings);
        assert!(text.contains("\n\ninitialDirectory=/home/user\n\nbackgroundColor="));
    }

    #[test]
    fn round_trip_preserves_every_field() {
        let settings = Settings {
            x: -40,
            y: 25,
            width: 1024,
            height: 300,
            font_size: 11,
            exit_on_exit: true,
            command: "bash -l".to_string(),
            font_family: "DejaVu Sans Mono".to_string(),
            initial_directory: Some(PathBuf::from("C:\\Users\\me\\work")),
            selection_foreground: Some(Color::new(1, 2, 3, 4)),
            bright_blue: Color::new(9, 9, 9, 9),
            ..Settings::default()
        };
        assert_eq!(from_ini(&to_ini(&settings)), settings);
    }

    #[test]
    fn tolerant_parse_keeps_defaults_for_bad_lines() {
        let settings = from_ini("width=abc\nheight=500\nfoo=bar\nbackgroundColor=rgb(10,20,30)\n");
        let expected = Settings {
            height: 500,
            background_color: Color::new(10, 20, 30, 255),
            ..Settings::default()
        };
        assert_eq!(settings, expected);
    }

    #[test]
    fn garbage_never_fails() {
        let settings = from_ini("=\n==\nno separator\n#x=5\n!y=5\n\u{feff}\nexitOnExit=maybe\n");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn whitespace_and_last_occurrence() {
        let mut settings = Settings::default();
        let applied = apply_ini("  fontSize =  20  \nfontSize=22\nred = #ff0000\n", &mut settings);
        assert_eq!(applied, 3);
        assert_eq!(settings.font_size, 22);
        assert_eq!(settings.red, Color::rgb(255, 0, 0));
    }

    #[test]
    fn text_values_round_trip_with_spaces() {
        let settings = Settings {
            command: " powershell.exe -NoLogo ".to_string(),
            font_family: "DejaVu Sans Mono".to_string(),
            ..Settings::default()
        };
        let text = to_ini(&settings);
        assert!(text.contains("command= powershell.exe -NoLogo \n"));
        assert_eq!(from_ini(&text), settings);
    }

    #[test]
    fn value_may_contain_equals_sign() {
        let settings = from_ini("command=env FOO=bar sh\n");
        assert_eq!(settings.command, "env FOO=bar sh");
    }
}
