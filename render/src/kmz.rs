//! KMZ packaging of rendered documents.
//!
//! A KMZ file is a zip archive with the document in `doc.kml` and every asset stored next to
//! it under its own name.
//!

use std::io::{Cursor, Write};

use chrono::{DateTime, Utc};
use tracing::{debug, trace};
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use fviz_sources::Saver;

use crate::{PackagingError, RenderedDocument};

/// Name of the document inside the archive
pub const DOC_ENTRY: &str = "doc.kml";

const ARCHIVE_PREFIX: &str = "fvk_";
const ARCHIVE_SUFFIX: &str = ".kmz";
const TS_FMT: &str = "%Y%m%d%H%M%SZ";

/// Compact rendering of a time range: the century is dropped from `from` and whatever `to`
/// shares with `from` at the front is removed.
///
/// `2023-01-02T03:04:05Z` to `2023-01-02T03:05:05Z` gives `("230102030405Z", "505Z")`.
///
pub fn ts_from_to(from: DateTime<Utc>, to: DateTime<Utc>) -> (String, String) {
    let from = from.format(TS_FMT).to_string().split_off(2);
    let to = to.format(TS_FMT).to_string().split_off(2);

    let common = from
        .bytes()
        .zip(to.bytes())
        .take_while(|(a, b)| a == b)
        .count();
    let to = to[common..].to_owned();
    (from, to)
}

/// File name of the archive for `doc`, `name` is the tail number or the flight id.
///
pub fn archive_name(name: &str, doc: &RenderedDocument) -> String {
    let (from, to) = ts_from_to(doc.start, doc.end);
    format!(
        "{ARCHIVE_PREFIX}{name}_{from}-{to}_{}{ARCHIVE_SUFFIX}",
        doc.layers.join("-")
    )
}

#[derive(Clone, Copy, Debug)]
pub struct Packager {
    method: CompressionMethod,
}

impl Default for Packager {
    fn default() -> Self {
        Packager {
            method: CompressionMethod::Deflated,
        }
    }
}

impl Packager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the archive in memory.
    ///
    #[tracing::instrument(skip_all, fields(flight = %doc.flight_id))]
    pub fn package(&self, doc: &RenderedDocument) -> Result<Vec<u8>, PackagingError> {
        let opts = SimpleFileOptions::default().compression_method(self.method);
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        zip.start_file(DOC_ENTRY, opts)?;
        zip.write_all(&doc.kml).map_err(ZipError::from)?;

        for (name, data) in &doc.assets {
            trace!("adding {name}");
            zip.start_file(name.as_str(), opts)?;
            zip.write_all(data).map_err(ZipError::from)?;
        }

        let buf = zip.finish()?.into_inner();
        debug!("archive is {} bytes", buf.len());
        Ok(buf)
    }

    /// Package `doc` and hand the archive to `saver` at `reference`.
    ///
    #[tracing::instrument(skip(self, saver, doc))]
    pub fn save(
        &self,
        saver: &dyn Saver,
        reference: &str,
        doc: &RenderedDocument,
    ) -> Result<(), PackagingError> {
        let data = self.package(doc)?;
        saver.save(reference, &data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::io::Read;

    use chrono::TimeZone;
    use rstest::rstest;
    use tempfile::tempdir;
    use zip::ZipArchive;

    use fviz_sources::{FileStore, InMemory};

    use super::*;

    fn doc() -> RenderedDocument {
        RenderedDocument {
            flight_id: "N123AB-1".to_owned(),
            kml: b"<kml/>".to_vec(),
            assets: BTreeMap::from([("icon.png".to_owned(), b"\x89PNG".to_vec())]),
            start: Utc.with_ymd_and_hms(2023, 1, 2, 3, 4, 5).unwrap(),
            end: Utc.with_ymd_and_hms(2023, 1, 2, 3, 5, 5).unwrap(),
            layers: vec!["camera".to_owned(), "path".to_owned()],
        }
    }

    fn entry(data: &[u8], name: &str) -> Vec<u8> {
        let mut zip = ZipArchive::new(Cursor::new(data)).unwrap();
        let mut f = zip.by_name(name).unwrap();
        let mut buf = vec![];
        f.read_to_end(&mut buf).unwrap();
        buf
    }

    #[rstest]
    #[case((2023, 1, 2, 3, 4, 5), (2023, 1, 2, 3, 5, 5), "230102030405Z", "505Z")]
    #[case((2023, 5, 10, 3, 45, 35), (2023, 5, 10, 5, 12, 7), "230510034535Z", "51207Z")]
    #[case((2023, 12, 31, 23, 0, 0), (2024, 1, 1, 1, 0, 0), "231231230000Z", "240101010000Z")]
    #[case((2023, 1, 2, 3, 4, 5), (2023, 1, 2, 3, 4, 5), "230102030405Z", "")]
    fn test_ts_from_to(
        #[case] from: (i32, u32, u32, u32, u32, u32),
        #[case] to: (i32, u32, u32, u32, u32, u32),
        #[case] f: &str,
        #[case] t: &str,
    ) {
        let from = Utc
            .with_ymd_and_hms(from.0, from.1, from.2, from.3, from.4, from.5)
            .unwrap();
        let to = Utc
            .with_ymd_and_hms(to.0, to.1, to.2, to.3, to.4, to.5)
            .unwrap();
        assert_eq!((f.to_string(), t.to_string()), ts_from_to(from, to));
    }

    #[test]
    fn test_archive_name() {
        assert_eq!(
            "fvk_N123AB_230102030405Z-505Z_camera-path.kmz",
            archive_name("N123AB", &doc())
        );
    }

    #[test]
    fn test_package_entries() {
        let data = Packager::new().package(&doc()).unwrap();

        let zip = ZipArchive::new(Cursor::new(data.as_slice())).unwrap();
        assert_eq!(2, zip.len());
        assert_eq!(b"<kml/>".to_vec(), entry(&data, DOC_ENTRY));
        assert_eq!(b"\x89PNG".to_vec(), entry(&data, "icon.png"));
    }

    #[test]
    fn test_package_no_assets() {
        let mut d = doc();
        d.assets.clear();
        let data = Packager::new().package(&d).unwrap();

        let zip = ZipArchive::new(Cursor::new(data.as_slice())).unwrap();
        assert_eq!(1, zip.len());
    }

    #[test]
    fn test_save_in_memory() {
        let store = InMemory::new();
        Packager::new().save(&store, "out.kmz", &doc()).unwrap();

        let data = store.get("out.kmz").unwrap();
        assert_eq!(b"<kml/>".to_vec(), entry(&data, DOC_ENTRY));
    }

    #[test]
    fn test_save_file() {
        let dir = tempdir().unwrap();
        let fname = dir.path().join("sub").join(archive_name("N123AB", &doc()));
        let reference = fname.to_string_lossy().to_string();

        Packager::new()
            .save(&FileStore, &reference, &doc())
            .unwrap();

        let data = std::fs::read(&fname).unwrap();
        assert_eq!(b"\x89PNG".to_vec(), entry(&data, "icon.png"));
    }

    #[test]
    fn test_save_error() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file");
        std::fs::write(&file, b"x").unwrap();

        // parent is a file
        let reference = file.join("out.kmz").to_string_lossy().to_string();
        let res = Packager::new().save(&FileStore, &reference, &doc());
        assert!(matches!(res, Err(PackagingError::Write(_))));
    }
}
