//! Custom code detection.
//!
//! Flags logic that resists declarative migration: standalone source files
//! in foreign languages, and script or class bindings embedded in
//! configuration elements. Nothing is ever executed; embedded text is only
//! measured.

use crate::error::AssessError;
use crate::model::{CustomCodeFinding, CustomCodeKind, Finding, SourceLocation};
use crate::utils::{count_lines, relative_path, source_files};
use std::path::Path;

/// Source file extensions treated as custom code, with their language
pub const FOREIGN_LANGUAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("java", "java"),
    ("groovy", "groovy"),
    ("py", "python"),
    ("js", "javascript"),
    ("rb", "ruby"),
    ("kt", "kotlin"),
    ("scala", "scala"),
];

/// How an embedded element carries its code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddedForm {
    /// Script text nested inside the element
    Text,
    /// Reference to a class; the element itself is the finding
    Binding,
}

/// Structural signature of an embedded custom-code element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddedSignature {
    /// Namespace label, empty for the core namespace
    pub label: &'static str,
    pub local: &'static str,
    /// Language when the element does not name its engine
    pub language: &'static str,
    pub kind: CustomCodeKind,
    pub form: EmbeddedForm,
    /// Only matches when the element carries a `class` attribute
    pub requires_class: bool,
}

const fn script(label: &'static str, local: &'static str, language: &'static str) -> EmbeddedSignature {
    EmbeddedSignature {
        label,
        local,
        language,
        kind: CustomCodeKind::EmbeddedScript,
        form: EmbeddedForm::Text,
        requires_class: false,
    }
}

const fn binding(label: &'static str, local: &'static str, requires_class: bool) -> EmbeddedSignature {
    EmbeddedSignature {
        label,
        local,
        language: "java",
        kind: CustomCodeKind::ForeignLanguage,
        form: EmbeddedForm::Binding,
        requires_class,
    }
}

/// Every recognized embedded custom-code element
pub const EMBEDDED_SIGNATURES: &[EmbeddedSignature] = &[
    // Mule 4 scripting module
    script("scripting", "execute", "script"),
    script("scripting", "code", "script"),
    // Mule 3 scripting
    script("scripting", "component", "script"),
    script("scripting", "transformer", "script"),
    script("scripting", "script", "script"),
    // Mule 3 MEL
    script("", "expression-component", "mel"),
    script("", "expression-transformer", "mel"),
    // Mule 4 Java module
    binding("java", "invoke", false),
    binding("java", "invoke-static", false),
    binding("java", "new", false),
    // Mule 3 class bindings
    binding("", "custom-transformer", true),
    binding("", "component", true),
];

/// Attribute naming the script engine
pub const ENGINE_ATTRIBUTE: &str = "engine";

/// Match an element against the embedded signatures
#[must_use]
pub fn embedded_signature(label: &str, local: &str, has_class: bool) -> Option<&'static EmbeddedSignature> {
    EMBEDDED_SIGNATURES
        .iter()
        .find(|s| s.label == label && s.local == local && (!s.requires_class || has_class))
}

/// Build the finding for one embedded element.
///
/// `engine` overrides the signature's default language; `text` is the code
/// nested in the element, possibly empty.
#[must_use]
pub fn embedded_finding(
    signature: &EmbeddedSignature,
    engine: Option<&str>,
    location: SourceLocation,
    text: &str,
) -> CustomCodeFinding {
    let language = engine
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map_or_else(|| signature.language.to_string(), str::to_lowercase);

    let lines = text.lines().filter(|l| !l.trim().is_empty()).count().max(1);

    CustomCodeFinding {
        kind: signature.kind,
        language,
        location,
        lines,
    }
}

/// Language of a standalone source file, from its extension
#[must_use]
pub fn language_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?;
    FOREIGN_LANGUAGE_EXTENSIONS
        .iter()
        .find(|(e, _)| e.eq_ignore_ascii_case(ext))
        .map(|(_, lang)| *lang)
}

/// Finds standalone foreign-language sources in a project.
#[derive(Debug, Clone, Copy, Default)]
pub struct CustomCodeDetector;

impl CustomCodeDetector {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Flag every foreign-language file under the project's `src/main`.
    ///
    /// Files that cannot be read are recorded in `findings` and skipped.
    pub fn detect_standalone(&self, root: &Path, findings: &mut Vec<Finding>) -> Vec<CustomCodeFinding> {
        let extensions: Vec<&str> = FOREIGN_LANGUAGE_EXTENSIONS.iter().map(|(e, _)| *e).collect();
        let (files, errors) = source_files(&root.join("src/main"), &extensions);
        for (path, err) in &errors {
            findings.push(Finding::from_error(relative_path(root, path), err));
        }

        let mut detected = Vec::with_capacity(files.len());
        for file in files {
            let relative = relative_path(root, &file);
            let Some(language) = language_for(&file) else {
                continue;
            };
            match count_lines(&file) {
                Ok(lines) => detected.push(CustomCodeFinding {
                    kind: CustomCodeKind::ForeignLanguage,
                    language: language.to_string(),
                    location: SourceLocation::file(relative),
                    lines: lines.max(1),
                }),
                Err(err) => {
                    let err = AssessError::io(&file, err);
                    tracing::warn!("Skipping custom code {relative}: {err}");
                    findings.push(Finding::from_error(relative, &err));
                }
            }
        }
        detected
    }
}
