use crate::core::geometry::find_leading_edge;
use crate::core::interp::linspace;
use crate::core::reader::parse_table;
use crate::core::table::{interpolate_table, merge_tables, split_table};
use crate::core::writer::write_table;
use crate::domain::model::{
    Mode, OutputFile, RunSummary, SourceData, SurfacePair, Table, TransformResult,
};
use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
use crate::utils::error::{MsesError, Result};
use chrono::Utc;
use std::io::Write;
use std::path::Path;
use zip::write::{FileOptions, ZipWriter};

pub const MANIFEST_FILE: &str = "manifest.json";
pub const ARCHIVE_FILE: &str = "mses_output.zip";

pub struct MsesPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> MsesPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    async fn read_table(&self, path: &str) -> Result<Table> {
        let bytes = self.storage.read_file(path).await?;
        let content = String::from_utf8(bytes).map_err(|e| MsesError::Parse {
            line: 0,
            message: format!("{} is not valid UTF-8: {}", path, e),
        })?;
        parse_table(&content)
    }

    /// x column and the column used for the leading edge duplicate check.
    fn resolve_columns(&self, table: &Table) -> Result<(String, String)> {
        let x_column = match self.config.x_column() {
            Some(name) => table.names()[table.column_index(name)?].clone(),
            None => table.names()[0].clone(),
        };

        let geometry_column = match self.config.geometry_column() {
            Some(name) => table.names()[table.column_index(name)?].clone(),
            None => table
                .first_data_column(&x_column)
                .ok_or_else(|| MsesError::MissingColumn {
                    name: "<data column>".to_string(),
                })?
                .to_string(),
        };

        Ok((x_column, geometry_column))
    }

    fn output(&self, stem: &str, table: &Table) -> Result<OutputFile> {
        let delimiter = self.config.delimiter();
        Ok(OutputFile {
            name: format!("{}.{}", stem, delimiter.extension()),
            contents: write_table(table, delimiter)?,
        })
    }

    fn output_location(&self, name: &str) -> String {
        Path::new(self.config.output_path())
            .join(name)
            .to_string_lossy()
            .into_owned()
    }

    fn build_archive(outputs: &[OutputFile], manifest: &[u8]) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

        for file in outputs {
            zip.start_file::<_, ()>(file.name.as_str(), FileOptions::default())?;
            zip.write_all(&file.contents)?;
        }

        zip.start_file::<_, ()>(MANIFEST_FILE, FileOptions::default())?;
        zip.write_all(manifest)?;

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}

/// Lay out both resampled surfaces side by side: x, then `<col>_lower`, `<col>_upper`.
fn combine_surfaces(xout: &[f64], resampled: &SurfacePair<Table>, x_column: &str) -> Result<Table> {
    let mut names = vec![x_column.to_string()];
    let mut columns = vec![xout.to_vec()];

    for name in resampled.upper.names().iter().filter(|n| *n != x_column) {
        names.push(format!("{}_lower", name));
        columns.push(resampled.lower.column(name)?.to_vec());
        names.push(format!("{}_upper", name));
        columns.push(resampled.upper.column(name)?.to_vec());
    }

    Table::new(names, columns)
}

/// Check that `merged` is `original`, minus the first lower surface row when
/// the leading edge was de-duplicated.
fn verify_round_trip(original: &Table, merged: &Table, leading_edge: usize) -> Result<bool> {
    let deduplicated = merged.len() + 1 == original.len();
    if !deduplicated && merged.len() != original.len() {
        return Err(MsesError::ProcessingError {
            message: format!(
                "round trip produced {} points from {}",
                merged.len(),
                original.len()
            ),
        });
    }

    for (name, column) in original.iter() {
        let expected: Vec<f64> = column
            .iter()
            .enumerate()
            .filter(|(i, _)| !(deduplicated && *i == leading_edge + 1))
            .map(|(_, v)| *v)
            .collect();

        if merged.column(name)? != expected.as_slice() {
            return Err(MsesError::ProcessingError {
                message: format!("round trip did not reproduce column '{}'", name),
            });
        }
    }

    Ok(deduplicated)
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for MsesPipeline<S, C> {
    async fn extract(&self) -> Result<SourceData> {
        let input = self.config.input_path();
        tracing::info!("📂 Reading MSES data from: {}", input);
        let table = self.read_table(input).await?;
        tracing::debug!(
            "Read {} points in columns {:?}",
            table.len(),
            table.names()
        );

        let lower = if self.config.mode() == Mode::Merge {
            let path = self
                .config
                .lower_input_path()
                .ok_or_else(|| MsesError::MissingConfigError {
                    field: "lower_input".to_string(),
                })?;
            tracing::info!("📂 Reading lower surface from: {}", path);
            Some(self.read_table(path).await?)
        } else {
            None
        };

        Ok(SourceData { table, lower })
    }

    async fn transform(&self, data: SourceData) -> Result<TransformResult> {
        let mode = self.config.mode();
        let table = &data.table;
        let (x_column, geometry_column) = self.resolve_columns(table)?;
        tracing::debug!(
            "Mode {}: x column '{}', geometry column '{}'",
            mode,
            x_column,
            geometry_column
        );

        let mut summary = RunSummary {
            mode,
            input: self.config.input_path().to_string(),
            lower_input: self.config.lower_input_path().map(str::to_string),
            columns: table.names().to_vec(),
            input_points: table.len(),
            leading_edge_index: None,
            upper_points: 0,
            lower_points: 0,
            merged_points: None,
            leading_edge_deduplicated: None,
            grid_points: None,
            files: Vec::new(),
            generated_at: Utc::now(),
        };
        let mut outputs = Vec::new();

        match mode {
            Mode::Split => {
                let le = find_leading_edge(table.column(&x_column)?)?;
                let split = split_table(table, &x_column)?;
                tracing::info!(
                    "✂️  Leading edge at index {}: {} upper / {} lower points",
                    le,
                    split.upper.len(),
                    split.lower.len()
                );

                summary.leading_edge_index = Some(le);
                summary.upper_points = split.upper.len();
                summary.lower_points = split.lower.len();
                outputs.push(self.output("upper", &split.upper)?);
                outputs.push(self.output("lower", &split.lower)?);
            }
            Mode::Interp => {
                let grid = self.config.grid();
                let xout = linspace(grid.x_min, grid.x_max, grid.points);
                let le = find_leading_edge(table.column(&x_column)?)?;
                let resampled = interpolate_table(&xout, table, &x_column)?;
                tracing::info!(
                    "📈 Interpolated both surfaces onto {} points in [{}, {}]",
                    xout.len(),
                    grid.x_min,
                    grid.x_max
                );

                summary.leading_edge_index = Some(le);
                summary.upper_points = resampled.upper.len();
                summary.lower_points = resampled.lower.len();
                summary.grid_points = Some(xout.len());
                let combined = combine_surfaces(&xout, &resampled, &x_column)?;
                outputs.push(self.output("interpolated", &combined)?);
            }
            Mode::Merge => {
                let lower = data
                    .lower
                    .as_ref()
                    .ok_or_else(|| MsesError::MissingConfigError {
                        field: "lower_input".to_string(),
                    })?;
                let merged = merge_tables(
                    lower,
                    table,
                    &x_column,
                    &geometry_column,
                    self.config.dedup(),
                )?;
                let deduplicated = merged.len() < table.len() + lower.len();
                tracing::info!(
                    "🔗 Merged {} upper + {} lower points into {} (leading edge deduplicated: {})",
                    table.len(),
                    lower.len(),
                    merged.len(),
                    deduplicated
                );

                summary.upper_points = table.len();
                summary.lower_points = lower.len();
                summary.merged_points = Some(merged.len());
                summary.leading_edge_deduplicated = Some(deduplicated);
                outputs.push(self.output("merged", &merged)?);
            }
            Mode::Roundtrip => {
                let le = find_leading_edge(table.column(&x_column)?)?;
                let split = split_table(table, &x_column)?;
                let merged = merge_tables(
                    &split.lower,
                    &split.upper,
                    &x_column,
                    &geometry_column,
                    self.config.dedup(),
                )?;
                let deduplicated = verify_round_trip(table, &merged, le)?;
                tracing::info!(
                    "🔁 Round trip reproduced {} of {} points",
                    merged.len(),
                    table.len()
                );

                summary.leading_edge_index = Some(le);
                summary.upper_points = split.upper.len();
                summary.lower_points = split.lower.len();
                summary.merged_points = Some(merged.len());
                summary.leading_edge_deduplicated = Some(deduplicated);
                outputs.push(self.output("upper", &split.upper)?);
                outputs.push(self.output("lower", &split.lower)?);
                outputs.push(self.output("merged", &merged)?);
            }
        }

        summary.files = outputs.iter().map(|f| f.name.clone()).collect();
        Ok(TransformResult { outputs, summary })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        for file in &result.outputs {
            let location = self.output_location(&file.name);
            self.storage.write_file(&location, &file.contents).await?;
            tracing::info!("💾 Wrote {}", location);
        }

        let manifest = serde_json::to_vec_pretty(&result.summary)?;
        self.storage
            .write_file(&self.output_location(MANIFEST_FILE), &manifest)
            .await?;

        if self.config.archive() {
            let archive = Self::build_archive(&result.outputs, &manifest)?;
            tracing::debug!("Writing ZIP archive ({} bytes)", archive.len());
            self.storage
                .write_file(&self.output_location(ARCHIVE_FILE), &archive)
                .await?;
        }

        Ok(self.config.output_path().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Delimiter, GridSpec, LeadingEdgeDedup};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    const GEOMETRY: &str = "x z
1.0 0.0
0.5 0.06
0.0 0.0
0.5 -0.04
1.0 0.0
";

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn with_files(files: &[(&str, &str)]) -> Self {
            let files = files
                .iter()
                .map(|(k, v)| (k.to_string(), v.as_bytes().to_vec()))
                .collect();
            Self {
                files: Arc::new(Mutex::new(files)),
            }
        }

        async fn get_text(&self, path: &str) -> Option<String> {
            let files = self.files.lock().await;
            files
                .get(path)
                .map(|data| String::from_utf8_lossy(data).into_owned())
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                MsesError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        input: String,
        lower_input: Option<String>,
        mode: Mode,
        grid: GridSpec,
        dedup: LeadingEdgeDedup,
        archive: bool,
    }

    impl MockConfig {
        fn new(mode: Mode) -> Self {
            Self {
                input: "geom.dat".to_string(),
                lower_input: None,
                mode,
                grid: GridSpec::default(),
                dedup: LeadingEdgeDedup::ZeroOrdinate,
                archive: false,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn input_path(&self) -> &str {
            &self.input
        }

        fn lower_input_path(&self) -> Option<&str> {
            self.lower_input.as_deref()
        }

        fn output_path(&self) -> &str {
            "out"
        }

        fn mode(&self) -> Mode {
            self.mode
        }

        fn grid(&self) -> GridSpec {
            self.grid
        }

        fn delimiter(&self) -> Delimiter {
            Delimiter::Comma
        }

        fn x_column(&self) -> Option<&str> {
            None
        }

        fn geometry_column(&self) -> Option<&str> {
            None
        }

        fn dedup(&self) -> LeadingEdgeDedup {
            self.dedup
        }

        fn archive(&self) -> bool {
            self.archive
        }
    }

    #[tokio::test]
    async fn test_split_mode_writes_both_surfaces() {
        let storage = MockStorage::with_files(&[("geom.dat", GEOMETRY)]);
        let pipeline = MsesPipeline::new(storage.clone(), MockConfig::new(Mode::Split));

        let data = pipeline.extract().await.unwrap();
        let result = pipeline.transform(data).await.unwrap();
        assert_eq!(result.summary.leading_edge_index, Some(2));
        assert_eq!(result.summary.upper_points, 3);
        assert_eq!(result.summary.lower_points, 2);

        let output = pipeline.load(result).await.unwrap();
        assert_eq!(output, "out");

        let upper = storage.get_text("out/upper.csv").await.unwrap();
        assert_eq!(upper, "x,z\n0,0\n0.5,0.06\n1,0\n");
        let lower = storage.get_text("out/lower.csv").await.unwrap();
        assert_eq!(lower, "x,z\n0.5,-0.04\n1,0\n");
        assert!(storage.get_text("out/manifest.json").await.is_some());
        assert!(storage.get_text("out/mses_output.zip").await.is_none());
    }

    #[tokio::test]
    async fn test_interp_mode_lays_out_lower_then_upper() {
        let storage = MockStorage::with_files(&[("geom.dat", GEOMETRY)]);
        let mut config = MockConfig::new(Mode::Interp);
        config.grid = GridSpec {
            points: 3,
            x_min: 0.0,
            x_max: 1.0,
        };
        let pipeline = MsesPipeline::new(storage, config);

        let data = pipeline.extract().await.unwrap();
        let result = pipeline.transform(data).await.unwrap();

        assert_eq!(result.summary.grid_points, Some(3));
        assert_eq!(result.outputs.len(), 1);
        assert_eq!(result.outputs[0].name, "interpolated.csv");

        let text = String::from_utf8(result.outputs[0].contents.clone()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "x,z_lower,z_upper");
        assert_eq!(lines[1], "0,-0.04,0");
        assert_eq!(lines[2], "0.5,-0.04,0.06");
        assert_eq!(lines[3], "1,0,0");
    }

    #[tokio::test]
    async fn test_merge_mode_reads_lower_surface() {
        let upper = "x z\n0.0 0.0\n0.5 0.06\n1.0 0.0\n";
        let lower = "x z\n0.0 0.0\n0.5 -0.04\n1.0 0.0\n";
        let storage = MockStorage::with_files(&[("upper.dat", upper), ("lower.dat", lower)]);
        let mut config = MockConfig::new(Mode::Merge);
        config.input = "upper.dat".to_string();
        config.lower_input = Some("lower.dat".to_string());
        let pipeline = MsesPipeline::new(storage.clone(), config);

        let data = pipeline.extract().await.unwrap();
        let result = pipeline.transform(data).await.unwrap();
        assert_eq!(result.summary.merged_points, Some(5));
        assert_eq!(result.summary.leading_edge_deduplicated, Some(true));

        pipeline.load(result).await.unwrap();
        let merged = storage.get_text("out/merged.csv").await.unwrap();
        assert_eq!(merged, "x,z\n1,0\n0.5,0.06\n0,0\n0.5,-0.04\n1,0\n");
    }

    #[tokio::test]
    async fn test_merge_mode_without_lower_input_fails() {
        let storage = MockStorage::with_files(&[("geom.dat", GEOMETRY)]);
        let pipeline = MsesPipeline::new(storage, MockConfig::new(Mode::Merge));

        let result = pipeline.extract().await;
        assert!(matches!(result, Err(MsesError::MissingConfigError { .. })));
    }

    #[tokio::test]
    async fn test_roundtrip_mode_with_duplicated_leading_edge() {
        let geometry = "x z\n1.0 0.0\n0.5 0.06\n0.0 0.0\n0.0 0.0\n0.5 -0.04\n1.0 0.0\n";
        let storage = MockStorage::with_files(&[("geom.dat", geometry)]);
        let mut config = MockConfig::new(Mode::Roundtrip);
        config.archive = true;
        let pipeline = MsesPipeline::new(storage.clone(), config);

        let data = pipeline.extract().await.unwrap();
        let result = pipeline.transform(data).await.unwrap();
        assert_eq!(result.summary.input_points, 6);
        assert_eq!(result.summary.merged_points, Some(5));
        assert_eq!(result.summary.leading_edge_deduplicated, Some(true));
        assert_eq!(
            result.summary.files,
            vec!["upper.csv", "lower.csv", "merged.csv"]
        );

        pipeline.load(result).await.unwrap();
        let files = storage.files.lock().await;
        assert!(files.contains_key("out/mses_output.zip"));
    }

    #[tokio::test]
    async fn test_malformed_input_is_rejected() {
        let storage = MockStorage::with_files(&[("geom.dat", "x y\n0.0 0.0\n0.5 0.1\n1.0 0.0\n")]);
        let pipeline = MsesPipeline::new(storage, MockConfig::new(Mode::Split));

        let data = pipeline.extract().await.unwrap();
        let result = pipeline.transform(data).await;
        assert!(matches!(result, Err(MsesError::MalformedCurve { .. })));
    }

    #[test]
    fn test_verify_round_trip_detects_mismatch() {
        let names = vec!["x".to_string(), "z".to_string()];
        let original = Table::new(
            names.clone(),
            vec![vec![1.0, 0.0, 1.0], vec![0.0, 0.0, -0.1]],
        )
        .unwrap();
        let altered = Table::new(names, vec![vec![1.0, 0.0, 1.0], vec![0.0, 0.0, 0.1]]).unwrap();

        assert!(!verify_round_trip(&original, &original, 1).unwrap());
        assert!(matches!(
            verify_round_trip(&original, &altered, 1),
            Err(MsesError::ProcessingError { .. })
        ));
    }
}
