#![no_main]

use libfuzzer_sys::fuzz_target;
use pdfplan::io::ImportSource;
use pdfplan::{Importer, Workspace};
use std::sync::OnceLock;
use tokio::runtime::{Builder, Runtime};

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

fn runtime() -> &'static Runtime {
    RUNTIME.get_or_init(|| Builder::new_current_thread().enable_all().build().unwrap())
}

fuzz_target!(|data: &[u8]| {
    let mut workspace = Workspace::new();
    let importer = Importer::default();
    let source = ImportSource::from_bytes("fuzz.pdf", data.to_vec());

    let result = runtime().block_on(importer.import(&mut workspace, source));

    // A failed import must leave the workspace untouched.
    match result {
        Ok(imported) => {
            assert_eq!(workspace.store().len(), 1);
            assert_eq!(workspace.plan().len(), imported.page_count);
        }
        Err(_) => {
            assert!(workspace.store().is_empty());
            assert!(workspace.plan().is_empty());
            assert!(workspace.last_error().is_some());
        }
    }
});
