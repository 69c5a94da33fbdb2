//! Shared inputs for CLI commands: dungeon layouts and search configuration

use std::{fs, path::Path};

use anyhow::{Context, Result};

use crate::{dungeon::GridDungeon, mcts::MctsConfig, reward::Persona};

/// Read and parse an ASCII dungeon layout.
pub fn load_dungeon(path: &Path) -> Result<GridDungeon> {
    let layout = fs::read_to_string(path)
        .with_context(|| format!("Failed to read dungeon layout {}", path.display()))?;
    GridDungeon::from_ascii(&layout)
        .with_context(|| format!("Invalid dungeon layout in {}", path.display()))
}

/// Map identifier used in file names: the layout's file stem (`map3.txt` -> `map3`).
pub fn map_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "map".to_string())
}

/// Parse a persona name given on the command line.
pub fn parse_persona(value: &str) -> Result<Persona> {
    value
        .parse()
        .with_context(|| format!("Invalid value '{value}' for --persona"))
}

/// Load an `MctsConfig` from JSON, falling back to defaults when no file is given.
pub fn load_mcts_config(path: Option<&Path>) -> Result<MctsConfig> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read MCTS config {}", path.display()))?;
            let config: MctsConfig = serde_json::from_str(&text)
                .with_context(|| format!("Invalid MCTS config in {}", path.display()))?;
            config
                .validate()
                .with_context(|| format!("Invalid MCTS config in {}", path.display()))?;
            Ok(config)
        }
        None => Ok(MctsConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_map_name_strips_extension() {
        assert_eq!(map_name(Path::new("dungeons/map7.txt")), "map7");
        assert_eq!(map_name(Path::new("layout")), "layout");
    }

    #[test]
    fn test_parse_persona_accepts_kebab_case() {
        assert_eq!(parse_persona("monster-killer").unwrap(), Persona::MonsterKiller);
        assert!(parse_persona("pacifist").is_err());
    }

    #[test]
    fn test_load_dungeon_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "#####\n#E.X#\n#####").unwrap();
        let dungeon = load_dungeon(file.path()).unwrap();
        assert_eq!(dungeon, GridDungeon::from_ascii("#####\n#E.X#\n#####").unwrap());
    }

    #[test]
    fn test_load_mcts_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"iterations": 12, "exploration": 0.7}}"#).unwrap();
        let config = load_mcts_config(Some(file.path())).unwrap();
        assert_eq!(config.iterations, 12);
        assert_eq!(config.exploration, 0.7);
        assert_eq!(load_mcts_config(None).unwrap(), MctsConfig::default());
    }

    #[test]
    fn test_load_mcts_config_rejects_bad_exploration() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"exploration": -1.0}}"#).unwrap();
        assert!(load_mcts_config(Some(file.path())).is_err());
    }
}
