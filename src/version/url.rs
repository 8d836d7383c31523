//! Registry URL dialects
//!
//! Every supported registry pins a dependency through its own URL shape.
//! Each shape gets one [`RegistryKind`] tag, a classification pattern, and a
//! uniform contract: extract the package key and pinned version, rewrite the
//! version segment, render the canonical specifier back out.

use std::sync::LazyLock;

use regex::Regex;

use crate::version::error::RegistryError;

/// One tag per supported URL dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryKind {
    /// `jsr:@scope/pkg@1.0.0/mod.ts`
    Jsr,
    /// `npm:pkg@1.0.0` or `npm:@scope/pkg@1.0.0`
    Npm,
    /// `https://deno.land/std@0.224.0/path/mod.ts`
    DenoStd,
    /// `https://deno.land/x/module@v1.0.0/mod.ts`
    DenoLand,
    /// `https://unpkg.com/@scope/pkg@1.0.0/mod.js`
    UnpkgScope,
    /// `https://unpkg.com/pkg@1.0.0/mod.js`
    Unpkg,
    /// `https://raw.githubusercontent.com/owner/repo/1.0.0/mod.ts`
    GithubRaw,
    /// `https://gitlab.com/owner/repo/-/raw/v1.0.0/mod.ts`
    GitlabRaw,
    /// `https://x.nest.land/pkg@1.0.0/mod.ts`
    NestLand,
}

// Every pattern captures three groups: (1) package key, (2) version
// segment, (3) trailing subpath. The forges require a version (it is a path
// segment); everywhere else it is optional.
static JSR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^jsr:(@[^/@]+/[^/@]+)(?:@([^/]+))?(/.*)?$").unwrap());
static NPM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^npm:(@[^/@]+/[^/@]+|[^/@]+)(?:@([^/]+))?(/.*)?$").unwrap());
static DENO_STD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https://deno\.land/(std)(?:@([^/]+))?(/.*)?$").unwrap());
static DENO_LAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https://deno\.land/x/([^/@]+)(?:@([^/]+))?(/.*)?$").unwrap());
static UNPKG_SCOPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://unpkg\.com/(@[^/@]+/[^/@]+)(?:@([^/]+))?(/.*)?$").unwrap()
});
static UNPKG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https://unpkg\.com/([^/@]+)(?:@([^/]+))?(/.*)?$").unwrap());
static GITHUB_RAW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://raw\.githubusercontent\.com/([^/]+/[^/]+)/([^/]+)(/.*)?$").unwrap()
});
static GITLAB_RAW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://gitlab\.com/([^/]+/[^/]+)/-/raw/([^/]+)(/.*)?$").unwrap()
});
static NEST_LAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https://x\.nest\.land/([^/@]+)(?:@([^/]+))?(/.*)?$").unwrap());

impl RegistryKind {
    /// Classification order for [`lookup`].
    ///
    /// More specific dialects come first. The scoped unpkg pattern MUST be
    /// tried before the unscoped one: every unscoped shape is a prefix away
    /// from a scoped one, and list order is the only disambiguation.
    pub const PRIORITY: [RegistryKind; 9] = [
        RegistryKind::Jsr,
        RegistryKind::Npm,
        RegistryKind::DenoStd,
        RegistryKind::DenoLand,
        RegistryKind::UnpkgScope,
        RegistryKind::Unpkg,
        RegistryKind::GithubRaw,
        RegistryKind::GitlabRaw,
        RegistryKind::NestLand,
    ];

    /// Returns the string representation of the registry kind
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistryKind::Jsr => "jsr",
            RegistryKind::Npm => "npm",
            RegistryKind::DenoStd => "deno_std",
            RegistryKind::DenoLand => "deno_land",
            RegistryKind::UnpkgScope => "unpkg_scope",
            RegistryKind::Unpkg => "unpkg",
            RegistryKind::GithubRaw => "github_raw",
            RegistryKind::GitlabRaw => "gitlab_raw",
            RegistryKind::NestLand => "nest_land",
        }
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            RegistryKind::Jsr => &JSR,
            RegistryKind::Npm => &NPM,
            RegistryKind::DenoStd => &DENO_STD,
            RegistryKind::DenoLand => &DENO_LAND,
            RegistryKind::UnpkgScope => &UNPKG_SCOPE,
            RegistryKind::Unpkg => &UNPKG,
            RegistryKind::GithubRaw => &GITHUB_RAW,
            RegistryKind::GitlabRaw => &GITLAB_RAW,
            RegistryKind::NestLand => &NEST_LAND,
        }
    }
}

/// A dependency specifier dissected into its dialect fields.
///
/// The version segment is kept verbatim, including any `^`/`~` range
/// operator the author wrote. The subpath is kept verbatim too and survives
/// every rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryUrl {
    kind: RegistryKind,
    name: String,
    version: Option<String>,
    subpath: String,
}

impl RegistryUrl {
    /// Try to dissect `specifier` as `kind`'s dialect.
    pub fn parse(kind: RegistryKind, specifier: &str) -> Option<Self> {
        let caps = kind.pattern().captures(specifier)?;
        Some(Self {
            kind,
            name: caps.get(1)?.as_str().to_string(),
            version: caps.get(2).map(|m| m.as_str().to_string()),
            subpath: caps.get(3).map(|m| m.as_str()).unwrap_or_default().to_string(),
        })
    }

    pub fn kind(&self) -> RegistryKind {
        self.kind
    }

    /// The package key: `@scope/pkg` for jsr and scoped npm/unpkg,
    /// `owner/repo` for the forges, the plain name everywhere else.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The pinned version segment, verbatim.
    pub fn version(&self) -> Result<&str, RegistryError> {
        self.version
            .as_deref()
            .ok_or_else(|| RegistryError::VersionNotFound(self.to_specifier()))
    }

    /// A new specifier of the same dialect with the version segment
    /// replaced. The receiver is untouched; the subpath carries over.
    pub fn at(&self, version: &str) -> Self {
        Self {
            version: Some(version.to_string()),
            ..self.clone()
        }
    }

    /// Render the canonical string form back out of the parsed fields.
    pub fn to_specifier(&self) -> String {
        // The forges embed the version as a path segment and can only have
        // been parsed from a shape that carries one.
        let path_version = self.version.as_deref().unwrap_or_default();
        let at_version = self
            .version
            .as_deref()
            .map(|v| format!("@{v}"))
            .unwrap_or_default();

        match self.kind {
            RegistryKind::Jsr => format!("jsr:{}{}{}", self.name, at_version, self.subpath),
            RegistryKind::Npm => format!("npm:{}{}{}", self.name, at_version, self.subpath),
            RegistryKind::DenoStd | RegistryKind::DenoLand => {
                let prefix = if self.kind == RegistryKind::DenoStd {
                    ""
                } else {
                    "x/"
                };
                format!(
                    "https://deno.land/{}{}{}{}",
                    prefix, self.name, at_version, self.subpath
                )
            }
            RegistryKind::UnpkgScope | RegistryKind::Unpkg => {
                format!("https://unpkg.com/{}{}{}", self.name, at_version, self.subpath)
            }
            RegistryKind::GithubRaw => format!(
                "https://raw.githubusercontent.com/{}/{}{}",
                self.name, path_version, self.subpath
            ),
            RegistryKind::GitlabRaw => format!(
                "https://gitlab.com/{}/-/raw/{}{}",
                self.name, path_version, self.subpath
            ),
            RegistryKind::NestLand => {
                format!("https://x.nest.land/{}{}{}", self.name, at_version, self.subpath)
            }
        }
    }
}

/// Find the first dialect that accepts `specifier`, in priority order.
///
/// `None` means no supported registry matched; callers treat that as
/// "leave the entry alone", not as an error.
pub fn lookup(specifier: &str) -> Option<RegistryUrl> {
    RegistryKind::PRIORITY
        .iter()
        .find_map(|kind| RegistryUrl::parse(*kind, specifier))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(
        "jsr:@luca/flag@^1.0.1/mod.ts",
        RegistryKind::Jsr,
        "@luca/flag",
        Some("^1.0.1"),
        "/mod.ts"
    )]
    #[case("jsr:@std/path", RegistryKind::Jsr, "@std/path", None, "")]
    #[case("npm:lodash@4.17.21", RegistryKind::Npm, "lodash", Some("4.17.21"), "")]
    #[case(
        "npm:@types/node@20.0.0/fs.d.ts",
        RegistryKind::Npm,
        "@types/node",
        Some("20.0.0"),
        "/fs.d.ts"
    )]
    #[case(
        "https://deno.land/std@0.224.0/path/mod.ts",
        RegistryKind::DenoStd,
        "std",
        Some("0.224.0"),
        "/path/mod.ts"
    )]
    #[case(
        "https://deno.land/x/oak@v12.6.1/mod.ts",
        RegistryKind::DenoLand,
        "oak",
        Some("v12.6.1"),
        "/mod.ts"
    )]
    #[case(
        "https://unpkg.com/@wc/utils@1.2.0/index.js",
        RegistryKind::UnpkgScope,
        "@wc/utils",
        Some("1.2.0"),
        "/index.js"
    )]
    #[case(
        "https://unpkg.com/preact@10.5.0/dist/preact.js",
        RegistryKind::Unpkg,
        "preact",
        Some("10.5.0"),
        "/dist/preact.js"
    )]
    #[case(
        "https://raw.githubusercontent.com/owner/repo/1.0.0/mod.ts",
        RegistryKind::GithubRaw,
        "owner/repo",
        Some("1.0.0"),
        "/mod.ts"
    )]
    #[case(
        "https://gitlab.com/owner/repo/-/raw/v0.4.0/mod.ts",
        RegistryKind::GitlabRaw,
        "owner/repo",
        Some("v0.4.0"),
        "/mod.ts"
    )]
    #[case(
        "https://x.nest.land/eggs@0.3.10/mod.ts",
        RegistryKind::NestLand,
        "eggs",
        Some("0.3.10"),
        "/mod.ts"
    )]
    fn lookup_classifies_and_extracts(
        #[case] specifier: &str,
        #[case] kind: RegistryKind,
        #[case] name: &str,
        #[case] version: Option<&str>,
        #[case] subpath: &str,
    ) {
        let url = lookup(specifier).unwrap();
        assert_eq!(url.kind(), kind);
        assert_eq!(url.name(), name);
        assert_eq!(url.version().ok(), version);
        assert_eq!(url.subpath, subpath);
    }

    #[rstest]
    #[case("./local/mod.ts")]
    #[case("https://example.com/foo@1.0.0/mod.ts")]
    #[case("node:fs")]
    fn lookup_returns_none_for_unsupported_specifiers(#[case] specifier: &str) {
        assert!(lookup(specifier).is_none());
    }

    #[test]
    fn scoped_unpkg_wins_over_unscoped() {
        let url = lookup("https://unpkg.com/@scope/pkg@1.0.0/mod.js").unwrap();
        assert_eq!(url.kind(), RegistryKind::UnpkgScope);
        assert_eq!(url.name(), "@scope/pkg");
    }

    #[rstest]
    #[case("jsr:@luca/flag@1.0.1/mod.ts")]
    #[case("npm:@types/node@20.0.0/fs.d.ts")]
    #[case("npm:lodash@4.17.21")]
    #[case("https://deno.land/std@0.224.0/path/mod.ts")]
    #[case("https://deno.land/x/oak@v12.6.1/mod.ts")]
    #[case("https://unpkg.com/@wc/utils@1.2.0/index.js")]
    #[case("https://unpkg.com/preact@10.5.0/dist/preact.js")]
    #[case("https://raw.githubusercontent.com/owner/repo/1.0.0/mod.ts")]
    #[case("https://gitlab.com/owner/repo/-/raw/v0.4.0/mod.ts")]
    #[case("https://x.nest.land/eggs@0.3.10/mod.ts")]
    fn to_specifier_round_trips(#[case] specifier: &str) {
        let url = lookup(specifier).unwrap();
        assert_eq!(url.to_specifier(), specifier);
    }

    #[rstest]
    #[case("jsr:@luca/flag@1.0.1/mod.ts", "2.0.0", "jsr:@luca/flag@2.0.0/mod.ts")]
    #[case("npm:preact@10.5.0/hooks", "10.19.3", "npm:preact@10.19.3/hooks")]
    #[case(
        "https://deno.land/std@0.100.0/fs/mod.ts",
        "0.224.0",
        "https://deno.land/std@0.224.0/fs/mod.ts"
    )]
    #[case(
        "https://deno.land/x/oak@v12.5.0/mod.ts",
        "v12.6.1",
        "https://deno.land/x/oak@v12.6.1/mod.ts"
    )]
    #[case(
        "https://unpkg.com/@scope/pkg@1.0.0/index.js",
        "1.1.0",
        "https://unpkg.com/@scope/pkg@1.1.0/index.js"
    )]
    #[case(
        "https://unpkg.com/preact@10.5.0/dist/preact.js",
        "10.19.3",
        "https://unpkg.com/preact@10.19.3/dist/preact.js"
    )]
    #[case(
        "https://x.nest.land/eggs@0.3.9/mod.ts",
        "0.3.10",
        "https://x.nest.land/eggs@0.3.10/mod.ts"
    )]
    #[case(
        "https://raw.githubusercontent.com/owner/repo/1.0.0/mod.ts",
        "2.1.0",
        "https://raw.githubusercontent.com/owner/repo/2.1.0/mod.ts"
    )]
    #[case(
        "https://gitlab.com/owner/repo/-/raw/v0.4.0/a/b.ts",
        "v0.5.0",
        "https://gitlab.com/owner/repo/-/raw/v0.5.0/a/b.ts"
    )]
    fn at_replaces_only_the_version_segment(
        #[case] specifier: &str,
        #[case] new_version: &str,
        #[case] expected: &str,
    ) {
        let url = lookup(specifier).unwrap();
        let rewritten = url.at(new_version);

        assert_eq!(rewritten.version().unwrap(), new_version);
        assert_eq!(rewritten.to_specifier(), expected);
        // the receiver is untouched
        assert_eq!(url.to_specifier(), specifier);
    }

    #[test]
    fn at_adds_a_version_where_none_was_pinned() {
        let url = lookup("jsr:@std/path").unwrap();
        assert!(matches!(
            url.version(),
            Err(RegistryError::VersionNotFound(_))
        ));

        let pinned = url.at("1.0.0");
        assert_eq!(pinned.to_specifier(), "jsr:@std/path@1.0.0");
    }

    #[test]
    fn version_not_found_names_the_specifier() {
        let url = lookup("https://deno.land/x/oak/mod.ts").unwrap();
        let err = url.version().unwrap_err();
        assert!(err.to_string().contains("https://deno.land/x/oak/mod.ts"));
    }
}
