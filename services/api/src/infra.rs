use metrics_exporter_prometheus::PrometheusHandle;
use profile_synth::export::ExportedBatch;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Writes the export under `dir`, creating the directory when needed. The
/// file name must be a single normal path component.
pub(crate) fn write_export(dir: &Path, batch: &ExportedBatch) -> io::Result<PathBuf> {
    let mut components = Path::new(&batch.file_name).components();
    if !matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("export file name '{}' is not a plain file name", batch.file_name),
        ));
    }

    fs::create_dir_all(dir)?;
    let path = dir.join(&batch.file_name);
    fs::write(&path, &batch.body)?;
    Ok(path)
}
