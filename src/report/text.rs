use docx_rs::{BreakType, Run, RunFonts};

use super::ReportError;

pub const FONT: &str = "Cambria";

pub fn fonts() -> RunFonts {
    RunFonts::new()
        .ascii(FONT)
        .hi_ansi(FONT)
        .east_asia(FONT)
        .cs(FONT)
}

/// Cambria run at `size_pt`. Line breaks become `<w:br/>` and tabs `<w:tab/>`;
/// a CRLF pair counts as one break.
pub fn run(value: &str, size_pt: usize) -> Run {
    let mut run = Run::new().fonts(fonts()).size(size_pt * 2);

    let normalized = value.replace("\r\n", "\n");
    for (i, line) in normalized.split(['\n', '\r']).enumerate() {
        if i > 0 {
            run = run.add_break(BreakType::TextWrapping);
        }
        for (j, piece) in line.split('\t').enumerate() {
            if j > 0 {
                run = run.add_tab();
            }
            if !piece.is_empty() {
                run = run.add_text(piece);
            }
        }
    }
    run
}

/// XML 1.0 `Char` production. Surrogates are not `char`s, so only C0
/// controls and the two noncharacters at the end of the BMP are excluded.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
}

/// Reject text that cannot be stored in a WordprocessingML part.
pub fn check(field: &'static str, value: &str) -> Result<(), ReportError> {
    match value.chars().find(|c| !is_xml_char(*c)) {
        Some(ch) => Err(ReportError::InvalidText { field, ch }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_characters_are_rejected() {
        assert!(check("cliente", "ACME S.A.").is_ok());
        assert!(check("cliente", "línea 1\r\nlínea 2\tfin").is_ok());

        let err = check("cliente", "ACME\u{1b}[0m").unwrap_err();
        assert!(matches!(err, ReportError::InvalidText { field: "cliente", ch: '\u{1b}' }));
        assert!(check("descripción", "hoja\u{0c}nueva").is_err());
        assert!(check("descripción", "nul\0").is_err());
        assert!(check("descripción", "\u{FFFF}").is_err());
    }

    #[test]
    fn accepted_characters() {
        for c in ['\t', '\n', '\r', ' ', 'ñ', '☑', '\u{D7FF}', '\u{E000}', '\u{10FFFF}'] {
            assert!(is_xml_char(c), "{c:?}");
        }
        for c in ['\0', '\u{8}', '\u{b}', '\u{1f}', '\u{FFFE}'] {
            assert!(!is_xml_char(c), "{c:?}");
        }
    }
}
