//! Loading generation contexts from JSON files.
//!
//! Files may be partial; any field left out takes its default value:
//!
//! ```json
//! { "biome": "ISLANDS", "seed": 7, "tree_density": 0.4 }
//! ```
//!
//! The seed is tracked separately so callers can tell "seed 0" apart from
//! "no seed given".

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::context::GenerationContext;
use crate::error::ConfigError;

/// Contents of a context file, before a seed has been settled on.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ContextFile {
    /// `None` when the file has no `seed` key
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(flatten)]
    pub context: GenerationContext,
}

impl ContextFile {
    /// Final context. Seed precedence: `seed`, then the file's seed, then a
    /// freshly drawn random one.
    pub fn into_context(self, seed: Option<u64>) -> GenerationContext {
        let seed = seed.or(self.seed).unwrap_or_else(rand::random);
        GenerationContext { seed, ..self.context }
    }
}

/// Read and validate a context file.
pub fn load_file(path: impl AsRef<Path>) -> Result<ContextFile, ConfigError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file = parse_file(&text).map_err(|err| match err {
        ConfigError::Parse { source, .. } => ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;
    debug!(path = %path.display(), biome = %file.context.biome, seed = ?file.seed, "loaded context file");
    Ok(file)
}

/// Parse and validate context file JSON.
pub fn parse_file(json: &str) -> Result<ContextFile, ConfigError> {
    let file: ContextFile = serde_json::from_str(json).map_err(|source| ConfigError::Parse {
        path: Default::default(),
        source,
    })?;
    file.context.validate()?;
    Ok(file)
}

/// Read and validate a context from a JSON file. A missing seed keeps the
/// default, so the result is reproducible from the file alone.
pub fn load_context(path: impl AsRef<Path>) -> Result<GenerationContext, ConfigError> {
    let file = load_file(path)?;
    Ok(match file.seed {
        Some(seed) => GenerationContext { seed, ..file.context },
        None => file.context,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::Biome;
    use crate::error::GenerationError;

    #[test]
    fn test_parse_partial_context() {
        let context = parse_file(r#"{ "biome": "ISLANDS", "seed": 7, "tree_density": 0.4 }"#)
            .unwrap()
            .into_context(None);
        assert_eq!(context.biome, Biome::Islands);
        assert_eq!(context.seed, 7);
        assert_eq!(context.tree_density, 0.4);
        assert_eq!(context.river_density, GenerationContext::default().river_density);
    }

    #[test]
    fn test_file_remembers_missing_seed() {
        let file = parse_file(r#"{ "biome": "DESERT" }"#).unwrap();
        assert_eq!(file.seed, None);
        assert_eq!(file.context.biome, Biome::Desert);

        let seeded = parse_file(r#"{ "seed": 0 }"#).unwrap();
        assert_eq!(seeded.seed, Some(0));
    }

    #[test]
    fn test_seed_precedence() {
        let file = parse_file(r#"{ "seed": 7, "river_density": 1 }"#).unwrap();
        assert_eq!(file.clone().into_context(None).seed, 7);
        assert_eq!(file.clone().into_context(Some(3)).seed, 3);
        assert_eq!(file.into_context(None).river_density, 1.0);

        let unseeded = parse_file(r#"{ "biome": "TUNDRA" }"#).unwrap();
        assert_eq!(unseeded.clone().into_context(Some(11)).seed, 11);
        // Without any seed a random one is drawn rather than the zero default.
        let seeds: Vec<u64> = (0..4).map(|_| unseeded.clone().into_context(None).seed).collect();
        assert!(seeds.windows(2).any(|w| w[0] != w[1]), "seeds did not vary: {:?}", seeds);
        assert_eq!(unseeded.into_context(None).biome, Biome::Tundra);
    }

    #[test]
    fn test_parse_rejects_unknown_biome() {
        assert!(matches!(parse_file(r#"{ "biome": "VOLCANO" }"#), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_parse_rejects_invalid_values() {
        let err = parse_file(r#"{ "stone_threshold": 2.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid(GenerationError::InvalidParameter { name: "stone_threshold", .. })
        ));
    }

    #[test]
    fn test_json_round_trip_keeps_context() {
        let context = GenerationContext::new(Biome::Mediterranean, 123).with_tree_density(0.6);
        let json = serde_json::to_string_pretty(&context).unwrap();
        let file = parse_file(&json).unwrap();
        assert_eq!(file.seed, Some(123));
        assert_eq!(file.into_context(None), context);
    }

    #[test]
    fn test_missing_file() {
        let err = load_context("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
