/*!
 * Per-language content minification
 *
 * Minification is best effort: every strategy may fail, and a failure only
 * means the file is emitted as written. Nothing in this module returns an
 * error to the walker.
 */

use std::ops::ControlFlow;
use std::path::Path;

use oxc::codegen::{CodegenOptions, CodegenReturn};
use oxc::diagnostics::Diagnostics;
use oxc::minifier::{CompressOptions, CompressOptionsUnused, MangleOptions};
use oxc::parser::ParserReturn;
use oxc::span::SourceType;
use oxc::transformer::{EngineTargets, JsxOptions, TransformOptions};
use oxc::CompilerInterface;
use thiserror::Error;
use tracing::debug;

/// Syntax level component files are lowered to
pub const COMPONENT_TARGET: &str = "es2018";

/// Error raised by a single minification strategy
#[derive(Error, Debug)]
pub enum MinifyError {
    /// The underlying transformer rejected the input
    #[error("{strategy} minifier failed: {message}")]
    Transform {
        /// Strategy name
        strategy: &'static str,
        /// Transformer diagnostic
        message: String,
    },

    /// The transformer produced nothing for non-empty input
    #[error("{strategy} minifier produced empty output")]
    Empty {
        /// Strategy name
        strategy: &'static str,
    },
}

/// Trait for minification strategies
pub trait Minifier {
    /// Short name used in diagnostics
    fn name(&self) -> &'static str;

    /// Minify `text`
    fn minify(&self, text: &str) -> Result<String, MinifyError>;
}

/// Available minification strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinifyStrategy {
    /// Plain scripts (`.js`)
    Script,
    /// TypeScript sources (`.ts`), types stripped before minifying
    TypeScript,
    /// Component modules (`.jsx`, `.tsx`)
    Component,
    /// JSON documents (`.json`)
    Json,
}

impl MinifyStrategy {
    /// Strategy for a leading-dot extension, `None` when the type is not minified
    pub fn for_extension(extension: &str) -> Option<Self> {
        match extension {
            ".js" => Some(Self::Script),
            ".ts" => Some(Self::TypeScript),
            ".jsx" | ".tsx" => Some(Self::Component),
            ".json" => Some(Self::Json),
            _ => None,
        }
    }

    /// How the parser should read the source, `None` for non-script strategies
    fn source_type(&self) -> Option<SourceType> {
        match self {
            Self::Script => Some(SourceType::unambiguous()),
            Self::TypeScript => Some(SourceType::ts()),
            // Both extensions go through the TSX grammar so typed components parse
            Self::Component => Some(SourceType::tsx()),
            Self::Json => None,
        }
    }

    /// Name handed to the transformer for diagnostics
    fn file_name(&self) -> &'static str {
        match self {
            Self::Script => "input.js",
            Self::TypeScript => "input.ts",
            Self::Component => "input.tsx",
            Self::Json => "input.json",
        }
    }
}

impl Minifier for MinifyStrategy {
    fn name(&self) -> &'static str {
        match self {
            Self::Script => "script",
            Self::TypeScript => "typescript",
            Self::Component => "component",
            Self::Json => "json",
        }
    }

    fn minify(&self, text: &str) -> Result<String, MinifyError> {
        let Some(source_type) = self.source_type() else {
            return Ok(strip_json(text));
        };

        let transform_error = |message: String| MinifyError::Transform {
            strategy: self.name(),
            message,
        };

        let mut compiler = match self {
            Self::Component => {
                ScriptCompiler::targeting(COMPONENT_TARGET).map_err(transform_error)?
            }
            _ => ScriptCompiler::new(TransformOptions::default(), EngineTargets::default()),
        };

        compiler.compile(text, source_type, Path::new(self.file_name()));
        match compiler.error {
            Some(message) => Err(transform_error(message)),
            None => Ok(compiler.printed),
        }
    }
}

/// One oxc run: parse, strip types, lower, compress, mangle locals, print
struct ScriptCompiler {
    transform: TransformOptions,
    target: EngineTargets,
    printed: String,
    error: Option<String>,
}

impl ScriptCompiler {
    fn new(mut transform: TransformOptions, target: EngineTargets) -> Self {
        // Imports stay unless they are explicitly type-only
        transform.typescript.only_remove_type_imports = true;
        // JSX markup is kept as written
        transform.jsx = JsxOptions::disable();
        Self {
            transform,
            target,
            printed: String::new(),
            error: None,
        }
    }

    /// Compiler lowering syntax newer than `target`
    fn targeting(target: &str) -> Result<Self, String> {
        let transform = TransformOptions::from_target(target)?;
        Ok(Self::new(transform, EngineTargets::from_target(target)?))
    }

    fn record(&mut self, diagnostics: &Diagnostics) {
        if self.error.is_none() {
            self.error = diagnostics.errors().next().map(ToString::to_string);
        }
    }
}

impl CompilerInterface for ScriptCompiler {
    fn handle_errors(&mut self, errors: Diagnostics) {
        self.record(&errors);
    }

    fn transform_options(&self) -> Option<&TransformOptions> {
        Some(&self.transform)
    }

    fn compress_options(&self) -> Option<CompressOptions> {
        Some(CompressOptions {
            target: self.target.clone(),
            unused: CompressOptionsUnused::Keep,
            ..CompressOptions::smallest()
        })
    }

    fn mangle_options(&self) -> Option<MangleOptions> {
        Some(MangleOptions {
            top_level: Some(false),
            ..MangleOptions::default()
        })
    }

    fn codegen_options(&self) -> Option<CodegenOptions> {
        Some(CodegenOptions::minify())
    }

    fn after_parse(&mut self, parser_return: &mut ParserReturn<'_>) -> ControlFlow<()> {
        if parser_return.fatal_error || parser_return.diagnostics.has_errors() {
            self.record(&parser_return.diagnostics);
            if self.error.is_none() {
                self.error = Some("parse failed".to_string());
            }
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    }

    fn after_codegen(&mut self, ret: CodegenReturn<'_>) {
        self.printed = ret.code;
    }
}

/// How a file's content came out of [`minify_contents`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinifyOutcome {
    /// Minification was not requested
    Disabled,
    /// No strategy exists for the extension
    Unsupported,
    /// Content was minified
    Minified,
    /// The strategy failed and the original content was kept
    FellBack,
}

/// Minified content plus the path it took
#[derive(Debug, Clone)]
pub struct Minified {
    /// Resulting text
    pub content: String,
    /// How it was produced
    pub outcome: MinifyOutcome,
}

/// Minify `content` by extension, returning the original text whenever
/// minification is disabled, unsupported or fails.
pub fn minify(content: &str, extension: &str, enabled: bool) -> String {
    minify_contents(content, extension, enabled).content
}

/// Like [`minify`], but also reports the outcome
pub fn minify_contents(content: &str, extension: &str, enabled: bool) -> Minified {
    let keep = |outcome| Minified {
        content: content.to_string(),
        outcome,
    };

    if !enabled {
        return keep(MinifyOutcome::Disabled);
    }

    let Some(strategy) = MinifyStrategy::for_extension(extension) else {
        return keep(MinifyOutcome::Unsupported);
    };

    let result = strategy.minify(content).and_then(|minified| {
        if minified.trim().is_empty() && !content.is_empty() {
            Err(MinifyError::Empty {
                strategy: strategy.name(),
            })
        } else {
            Ok(minified)
        }
    });

    match result {
        Ok(minified) => Minified {
            content: minified,
            outcome: MinifyOutcome::Minified,
        },
        Err(e) => {
            debug!(extension, "keeping original content: {}", e);
            keep(MinifyOutcome::FellBack)
        }
    }
}

/// Remove comments and insignificant whitespace from JSON text.
///
/// String literals are copied untouched. The input does not have to be valid
/// JSON; anything outside strings and comments is kept as-is.
pub fn strip_json(text: &str) -> String {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum State {
        Code,
        Str,
        LineComment,
        BlockComment,
    }

    let mut out = String::with_capacity(text.len());
    let mut state = State::Code;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            State::Code => match c {
                '"' => {
                    out.push(c);
                    state = State::Str;
                }
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    state = State::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    state = State::BlockComment;
                }
                ' ' | '\t' | '\n' | '\r' => {}
                _ => out.push(c),
            },
            State::Str => {
                out.push(c);
                match c {
                    '\\' => {
                        if let Some(escaped) = chars.next() {
                            out.push(escaped);
                        }
                    }
                    '"' => state = State::Code,
                    _ => {}
                }
            }
            State::LineComment => {
                if c == '\n' || c == '\r' {
                    state = State::Code;
                }
            }
            State::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = State::Code;
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_is_identity() {
        let samples = [
            ("const  a = 1 ;\n", ".js"),
            ("{ \"a\" : 1 }", ".json"),
            ("# Title\n\n", ".md"),
            ("", ".ts"),
            ("export const X = () => <div />;", ".tsx"),
        ];
        for (content, ext) in samples {
            assert_eq!(minify(content, ext, false), content);
            assert_eq!(
                minify_contents(content, ext, false).outcome,
                MinifyOutcome::Disabled
            );
        }
    }

    #[test]
    fn test_unsupported_extension_is_identity() {
        let content = "fn main() {\n    println!(\"hi\");\n}\n";
        let minified = minify_contents(content, ".rs", true);
        assert_eq!(minified.content, content);
        assert_eq!(minified.outcome, MinifyOutcome::Unsupported);
    }

    #[test]
    fn test_strategy_table() {
        assert_eq!(MinifyStrategy::for_extension(".js"), Some(MinifyStrategy::Script));
        assert_eq!(MinifyStrategy::for_extension(".ts"), Some(MinifyStrategy::TypeScript));
        assert_eq!(MinifyStrategy::for_extension(".jsx"), Some(MinifyStrategy::Component));
        assert_eq!(MinifyStrategy::for_extension(".tsx"), Some(MinifyStrategy::Component));
        assert_eq!(MinifyStrategy::for_extension(".json"), Some(MinifyStrategy::Json));
        assert_eq!(MinifyStrategy::for_extension(".css"), None);
        assert_eq!(MinifyStrategy::for_extension("js"), None);
    }

    #[test]
    fn test_script_minification_shrinks_code() {
        let content = "function add(first, second) {\n    return first + second;\n}\n\nadd(1, 2);\n";
        let minified = minify_contents(content, ".js", true);
        assert_eq!(minified.outcome, MinifyOutcome::Minified);
        assert!(!minified.content.is_empty());
        assert!(minified.content.len() < content.len());
    }

    #[test]
    fn test_script_keeps_accessors() {
        let content = "export const o = { get a() { return 1 }, set a(v) {}, [k]: 2, ...r };\n";
        let minified = minify_contents(content, ".js", true);
        assert_eq!(minified.outcome, MinifyOutcome::Minified);
        assert!(minified.content.contains("get a(){return 1}"), "{}", minified.content);
        assert!(minified.content.contains("set a("), "{}", minified.content);
        assert!(minified.content.contains("...r"), "{}", minified.content);
    }

    #[test]
    fn test_script_accepts_async_iteration() {
        let content = "async function drain(items) {\n    for await (const item of items) {\n        console.log(item);\n    }\n}\n\ndrain([]);\n";
        let minified = minify_contents(content, ".js", true);
        assert_eq!(minified.outcome, MinifyOutcome::Minified);
        assert!(minified.content.contains("for await"), "{}", minified.content);
        assert!(minified.content.len() < content.len());
    }

    #[test]
    fn test_typescript_types_are_stripped() {
        let content = "export function add(first: number, second: number): number {\n    return first + second;\n}\n";
        let minified = minify_contents(content, ".ts", true);
        assert_eq!(minified.outcome, MinifyOutcome::Minified);
        assert!(!minified.content.contains("number"), "{}", minified.content);
        assert!(minified.content.contains("add"), "{}", minified.content);
    }

    #[test]
    fn test_typed_component_is_minified() {
        let content = "export const App = (p: { name: string }) => <div>{p.name}</div>;\n";
        let minified = minify_contents(content, ".tsx", true);
        assert_eq!(minified.outcome, MinifyOutcome::Minified);
        assert!(!minified.content.contains("string"), "{}", minified.content);
        assert!(minified.content.contains("<div>"), "{}", minified.content);
        assert!(minified.content.len() < content.len());
    }

    #[test]
    fn test_untyped_component_is_minified() {
        let content = "export default function Greeting({ name }) {\n    return <p className=\"greeting\">Hello {name}</p>;\n}\n";
        let minified = minify_contents(content, ".jsx", true);
        assert_eq!(minified.outcome, MinifyOutcome::Minified);
        assert!(minified.content.contains("className"), "{}", minified.content);
        assert!(minified.content.len() < content.len());
    }

    #[test]
    fn test_script_failure_falls_back_to_original() {
        let content = "function ( {{{ this is not javascript";
        let minified = minify_contents(content, ".js", true);
        assert_eq!(minified.content, content);
        assert_eq!(minified.outcome, MinifyOutcome::FellBack);
    }

    #[test]
    fn test_component_failure_falls_back_to_original() {
        let content = "export default function App( {{ <div>";
        assert_eq!(minify(content, ".tsx", true), content);
    }

    #[test]
    fn test_failure_never_returns_empty() {
        for ext in [".js", ".ts", ".jsx", ".tsx", ".json"] {
            let content = "   \n\t ";
            let minified = minify(content, ext, true);
            assert!(!minified.is_empty(), "empty output for {}", ext);
        }
    }

    #[test]
    fn test_empty_input_stays_empty() {
        assert_eq!(minify("", ".json", true), "");
    }

    #[test]
    fn test_json_minification() {
        let content = "{\n  \"name\": \"repo\",\n  \"tags\": [1, 2, 3]\n}\n";
        assert_eq!(
            minify(content, ".json", true),
            r#"{"name":"repo","tags":[1,2,3]}"#
        );
    }

    #[test]
    fn test_strip_json_removes_comments() {
        let content = "{\n  // line comment\n  \"a\": 1, /* block\n comment */ \"b\": 2\n}";
        assert_eq!(strip_json(content), r#"{"a":1,"b":2}"#);
    }

    #[test]
    fn test_strip_json_keeps_strings_intact() {
        let content = r#"{ "url": "http://x.y/*z*/", "say": "a \"quoted\" // word", "sp": " a b " }"#;
        assert_eq!(
            strip_json(content),
            r#"{"url":"http://x.y/*z*/","say":"a \"quoted\" // word","sp":" a b "}"#
        );
    }

    #[test]
    fn test_strip_json_escaped_backslash_before_quote() {
        let content = r#"{ "path": "C:\\", "next": 1 }"#;
        assert_eq!(strip_json(content), r#"{"path":"C:\\","next":1}"#);
    }

    #[test]
    fn test_minify_does_not_touch_input() {
        let content = String::from("{ \"a\": 1 }");
        let before = content.clone();
        let _ = minify(&content, ".json", true);
        assert_eq!(content, before);
    }
}
