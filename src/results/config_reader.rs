use crate::results::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The built-in descriptions of the past competitions.
const PRESETS: [(&str, &str); 3] = [
    ("ipc08", include_str!("../../configs/ipc08.json")),
    ("ipc11", include_str!("../../configs/ipc11.json")),
    ("ipc14", include_str!("../../configs/ipc14.json")),
];

/// The layouts of the result tables.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Provider {
    Flat,
    QualityMatrix,
    SolutionSeries,
}

/// One output file of a competition year: a domain and a track.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Conversion {
    pub domain: String,
    pub track: String,
    #[serde(rename = "domainFilter")]
    _domain_filter: Option<String>,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "scoreFilePath")]
    pub score_file_path: Option<String>,
    #[serde(rename = "outputFile")]
    pub output_file: String,
}

impl Conversion {
    /// The text that identifies the domain in the domain column.
    pub fn domain_filter(&self) -> &str {
        self._domain_filter.as_deref().unwrap_or(&self.domain)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct CompetitionConfig {
    pub competition: String,
    #[serde(rename = "provider")]
    _provider: String,
    #[serde(rename = "delimiter")]
    _delimiter: Option<String>,
    #[serde(rename = "dropLastRow")]
    _drop_last_row: Option<bool>,
    #[serde(rename = "statusTable")]
    pub status_table: BTreeMap<String, ExitStatus>,
    #[serde(rename = "excludedPlanners", default)]
    pub excluded_planners: Vec<String>,
    pub conversions: Vec<Conversion>,
}

impl CompetitionConfig {
    pub fn provider(&self) -> ResultsResult<Provider> {
        match self._provider.as_str() {
            "flat" => Ok(Provider::Flat),
            "qualityMatrix" => Ok(Provider::QualityMatrix),
            "solutionSeries" => Ok(Provider::SolutionSeries),
            x => UnknownProviderSnafu { provider: x }.fail(),
        }
    }

    pub fn delimiter(&self) -> ResultsResult<u8> {
        match self._delimiter.as_deref() {
            None => Ok(b','),
            Some(d) if d.len() == 1 && d.is_ascii() => Ok(d.as_bytes()[0]),
            Some(d) => InvalidDelimiterSnafu { delimiter: d }.fail(),
        }
    }

    pub fn drop_last_row(&self) -> bool {
        self._drop_last_row.unwrap_or(false)
    }

    pub fn rules(&self, domain: &str) -> ConversionRules {
        ConversionRules {
            domain: domain.to_string(),
            status_table: self
                .status_table
                .iter()
                .map(|(code, status)| (code.clone(), *status))
                .collect(),
            excluded_planners: self.excluded_planners.iter().cloned().collect(),
        }
    }
}

pub fn read_config(path: &str) -> ResultsResult<CompetitionConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: CompetitionConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    if config.status_table.is_empty() {
        whatever!("{}: the status table is empty", path);
    }
    Ok(config)
}

pub fn preset_config(name: &str) -> ResultsResult<CompetitionConfig> {
    let (_, contents) = PRESETS
        .iter()
        .find(|(n, _)| *n == name)
        .context(UnknownPresetSnafu { name })?;
    serde_json::from_str(contents).context(ParsingPresetSnafu { name })
}

/// Finds the description of the competition, and the directory from which
/// the relative paths are resolved.
pub fn load_competition(
    config_path: Option<String>,
    preset: Option<String>,
    input_dir: Option<String>,
) -> ResultsResult<(CompetitionConfig, PathBuf)> {
    match (config_path, preset) {
        (Some(path), _) => {
            let config = read_config(&path)?;
            let root = match input_dir {
                Some(d) => PathBuf::from(d),
                None => Path::new(&path)
                    .parent()
                    .map(|p| p.to_path_buf())
                    .unwrap_or_default(),
            };
            Ok((config, root))
        }
        (None, Some(name)) => {
            let config = preset_config(&name)?;
            Ok((config, PathBuf::from(input_dir.unwrap_or_else(|| ".".to_string()))))
        }
        (None, None) => whatever!("Either a configuration file (--config) or a preset (--preset) is required"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        for (name, _) in PRESETS.iter() {
            let config = preset_config(name).unwrap();
            assert_eq!(config.competition, *name);
            assert!(config.provider().is_ok());
            assert!(config.delimiter().is_ok());
            assert!(!config.conversions.is_empty());
        }
    }

    #[test]
    fn ipc08_preset() {
        let config = preset_config("ipc08").unwrap();
        assert_eq!(config.provider().unwrap(), Provider::Flat);
        assert_eq!(config.delimiter().unwrap(), b' ');
        let rules = config.rules("transport-strips");
        for planner in ["ref", "upwards", "dae1", "dae2", "c3"] {
            assert!(rules.excluded_planners.contains(planner));
        }
        assert!(!rules.excluded_planners.contains("lama"));
        assert_eq!(rules.status_table.get("OK"), Some(ExitStatus::Valid));
        assert_eq!(rules.status_table.get("subopt"), Some(ExitStatus::Subopt));
        assert_eq!(rules.status_table.len(), 4);
        let outputs: Vec<&str> = config
            .conversions
            .iter()
            .map(|c| c.output_file.as_str())
            .collect();
        assert!(outputs.contains(&"transport-numeric-tempo-sat-ipc08-results.json"));
        assert_eq!(outputs.len(), 4);
    }

    #[test]
    fn ipc11_preset() {
        let config = preset_config("ipc11").unwrap();
        assert_eq!(config.provider().unwrap(), Provider::SolutionSeries);
        let rules = config.rules("transport-strips");
        assert_eq!(rules.status_table.get("2"), Some(ExitStatus::Valid));
        assert_eq!(rules.status_table.get("1"), Some(ExitStatus::Invalid));
        assert_eq!(rules.status_table.get("0"), Some(ExitStatus::Unsolved));
        assert_eq!(config.excluded_planners.len(), 9);
        assert!(rules.excluded_planners.contains("satplanlm-c"));
    }

    #[test]
    fn ipc14_preset() {
        let config = preset_config("ipc14").unwrap();
        assert_eq!(config.provider().unwrap(), Provider::QualityMatrix);
        assert!(config.drop_last_row());
        assert_eq!(config.excluded_planners.len(), 14);
        let opt = config
            .conversions
            .iter()
            .find(|c| c.track == "seq-opt")
            .unwrap();
        assert_eq!(opt.score_file_path, None);
        assert_eq!(opt.domain, "transport-strips");
        assert_eq!(opt.file_path, "csv/transport-seq-opt.csv");
    }

    #[test]
    fn unknown_preset() {
        assert!(matches!(
            preset_config("ipc98"),
            Err(ResultsError::UnknownPreset { .. })
        ));
    }

    #[test]
    fn config_options() {
        let config: CompetitionConfig = serde_json::from_str(
            r#"{"competition": "test", "provider": "csv", "delimiter": ";;",
                "statusTable": {"ok": "VALID"},
                "conversions": [{"domain": "d", "track": "t", "domainFilter": "dom",
                                 "filePath": "a.csv", "outputFile": "a.json"}]}"#,
        )
        .unwrap();
        assert!(matches!(
            config.provider(),
            Err(ResultsError::UnknownProvider { .. })
        ));
        assert!(matches!(
            config.delimiter(),
            Err(ResultsError::InvalidDelimiter { .. })
        ));
        assert!(!config.drop_last_row());
        assert!(config.excluded_planners.is_empty());
        assert_eq!(config.conversions[0].domain_filter(), "dom");
    }

    #[test]
    fn status_names_are_checked() {
        let res: Result<CompetitionConfig, _> = serde_json::from_str(
            r#"{"competition": "test", "provider": "flat",
                "statusTable": {"ok": "FINE"}, "conversions": []}"#,
        );
        assert!(res.is_err());
    }
}
