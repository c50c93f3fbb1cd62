use crate::domain::model::{Delimiter, GridSpec, LeadingEdgeDedup, Mode};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{MsesError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub job: JobConfig,
    pub input: InputConfig,
    #[serde(default)]
    pub transform: TransformConfig,
    pub output: OutputConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: String,
    /// Lower surface file for merge jobs.
    pub lower_path: Option<String>,
    pub x_column: Option<String>,
    pub geometry_column: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransformConfig {
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub dedup: LeadingEdgeDedup,
    pub grid: Option<GridConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    pub points: Option<usize>,
    pub x_min: Option<f64>,
    pub x_max: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    #[serde(default)]
    pub delimiter: Delimiter,
    #[serde(default)]
    pub archive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    /// "compact" (default) or "json"
    pub format: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MsesError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| MsesError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| MsesError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("job.name", &self.job.name)?;
        validation::validate_path("input.path", &self.input.path)?;
        validation::validate_path("output.path", &self.output.path)?;

        if self.transform.mode == Mode::Merge {
            let lower =
                validation::validate_required_field("input.lower_path", &self.input.lower_path)?;
            validation::validate_path("input.lower_path", lower)?;
        }

        if self.transform.mode == Mode::Interp {
            validation::validate_grid("transform.grid", &self.grid())?;
        }

        if let Some(logging) = &self.logging {
            if let Some(format) = &logging.format {
                let valid_formats = ["compact", "json"];
                if !valid_formats.contains(&format.as_str()) {
                    return Err(MsesError::InvalidConfigValueError {
                        field: "logging.format".to_string(),
                        value: format.clone(),
                        reason: format!(
                            "Unsupported format. Valid formats: {}",
                            valid_formats.join(", ")
                        ),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn json_logging(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.format.as_deref())
            .map(|f| f == "json")
            .unwrap_or(false)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.input.path
    }

    fn lower_input_path(&self) -> Option<&str> {
        self.input.lower_path.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn mode(&self) -> Mode {
        self.transform.mode
    }

    fn grid(&self) -> GridSpec {
        let defaults = GridSpec::default();
        match &self.transform.grid {
            Some(grid) => GridSpec {
                points: grid.points.unwrap_or(defaults.points),
                x_min: grid.x_min.unwrap_or(defaults.x_min),
                x_max: grid.x_max.unwrap_or(defaults.x_max),
            },
            None => defaults,
        }
    }

    fn delimiter(&self) -> Delimiter {
        self.output.delimiter
    }

    fn x_column(&self) -> Option<&str> {
        self.input.x_column.as_deref()
    }

    fn geometry_column(&self) -> Option<&str> {
        self.input.geometry_column.as_deref()
    }

    fn dedup(&self) -> LeadingEdgeDedup {
        self.transform.dedup
    }

    fn archive(&self) -> bool {
        self.output.archive
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
