//! Language detection by file name.
//!
//! The table maps an extension (or a well-known file name) to a language tag
//! used for code fences, and records whether that language counts as source
//! code for the non-code policy. Files that match nothing are non-code.

use std::path::Path;

/// Detected language of a changed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    /// Fence tag, e.g. `typescript`.
    pub tag: &'static str,
    /// `false` for docs, data and lock files.
    pub is_code: bool,
}

const fn code(tag: &'static str) -> Language {
    Language { tag, is_code: true }
}

const fn text(tag: &'static str) -> Language {
    Language {
        tag,
        is_code: false,
    }
}

/// Whole file names that have no telling extension.
fn by_file_name(name: &str) -> Option<Language> {
    let lang = match name {
        "Dockerfile" | "Containerfile" => code("dockerfile"),
        "Makefile" | "GNUmakefile" => code("makefile"),
        "Jenkinsfile" => code("groovy"),
        "CMakeLists.txt" => code("cmake"),
        "Cargo.lock" | "package-lock.json" | "yarn.lock" | "pnpm-lock.yaml" | "poetry.lock"
        | "Gemfile.lock" | "composer.lock" | "packages.lock.json" => text("lock"),
        _ => return None,
    };
    Some(lang)
}

fn by_extension(ext: &str) -> Option<Language> {
    let lang = match ext {
        "rs" => code("rust"),
        "ts" | "mts" | "cts" => code("typescript"),
        "tsx" => code("tsx"),
        "js" | "mjs" | "cjs" => code("javascript"),
        "jsx" => code("jsx"),
        "py" | "pyi" => code("python"),
        "cs" => code("csharp"),
        "fs" | "fsx" => code("fsharp"),
        "vb" => code("vbnet"),
        "java" => code("java"),
        "kt" | "kts" => code("kotlin"),
        "scala" => code("scala"),
        "groovy" | "gradle" => code("groovy"),
        "go" => code("go"),
        "c" | "h" => code("c"),
        "cc" | "cpp" | "cxx" | "hpp" | "hh" | "hxx" => code("cpp"),
        "m" | "mm" => code("objectivec"),
        "swift" => code("swift"),
        "dart" => code("dart"),
        "rb" => code("ruby"),
        "php" => code("php"),
        "pl" | "pm" => code("perl"),
        "lua" => code("lua"),
        "r" => code("r"),
        "ex" | "exs" => code("elixir"),
        "erl" | "hrl" => code("erlang"),
        "hs" => code("haskell"),
        "clj" | "cljs" => code("clojure"),
        "sql" => code("sql"),
        "sh" | "bash" | "zsh" => code("bash"),
        "ps1" | "psm1" => code("powershell"),
        "bat" | "cmd" => code("batch"),
        "html" | "htm" => code("html"),
        "css" => code("css"),
        "scss" | "sass" => code("scss"),
        "less" => code("less"),
        "vue" => code("vue"),
        "svelte" => code("svelte"),
        "tf" | "hcl" => code("hcl"),
        "proto" => code("protobuf"),
        "graphql" | "gql" => code("graphql"),
        "md" | "markdown" => text("markdown"),
        "rst" => text("rst"),
        "txt" => text("text"),
        "json" | "jsonc" => text("json"),
        "yml" | "yaml" => text("yaml"),
        "toml" => text("toml"),
        "xml" | "csproj" | "props" | "targets" | "config" => text("xml"),
        "ini" | "cfg" => text("ini"),
        "csv" => text("csv"),
        "lock" => text("lock"),
        "svg" => text("svg"),
        _ => return None,
    };
    Some(lang)
}

/// Detects the language of `path`.
///
/// Returns `None` for unknown extensions and files without one.
pub fn detect(path: &str) -> Option<Language> {
    let p = Path::new(path);
    if let Some(lang) = p.file_name().and_then(|n| n.to_str()).and_then(by_file_name) {
        return Some(lang);
    }
    let ext = p.extension()?.to_str()?.to_ascii_lowercase();
    by_extension(&ext)
}

/// `true` when `path` is recognized as a programming-language source file.
pub fn is_code(path: &str) -> bool {
    detect(path).is_some_and(|l| l.is_code)
}
