use crate::error::{CliError, Result};
use nalgebra::Point3;
use pepsurf::core::models::residue::Residue;
use pepsurf::core::models::set::ResidueSet;
use pepsurf::engine::error::EngineError;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// One row of the residue table. `x, y, z` is the backbone position; the
/// optional `cx, cy, cz` triple is the side-chain centroid.
#[derive(Debug, Deserialize)]
struct ResidueRow {
    chain_id: char,
    seq_index: isize,
    code: char,
    x: f64,
    y: f64,
    z: f64,
    #[serde(default)]
    cx: Option<f64>,
    #[serde(default)]
    cy: Option<f64>,
    #[serde(default)]
    cz: Option<f64>,
}

impl ResidueRow {
    fn into_residue(self) -> std::result::Result<Residue, String> {
        let residue = Residue::new(self.code.to_ascii_uppercase(), self.seq_index, self.chain_id)
            .with_backbone(Point3::new(self.x, self.y, self.z));
        match (self.cx, self.cy, self.cz) {
            (Some(cx), Some(cy), Some(cz)) => Ok(residue.with_centroid(Point3::new(cx, cy, cz))),
            (None, None, None) => Ok(residue),
            _ => Err(format!(
                "residue {}{} has an incomplete centroid (cx, cy, cz must be given together)",
                self.chain_id, self.seq_index
            )),
        }
    }
}

pub fn read_residues<R: Read>(reader: R) -> Result<ResidueSet> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .flexible(true)
        .from_reader(reader);

    let mut residues = Vec::new();
    for row in csv_reader.deserialize::<ResidueRow>() {
        let residue = row?.into_residue().map_err(CliError::Argument)?;
        residues.push(residue);
    }
    debug!(rows = residues.len(), "Residue table parsed.");

    ResidueSet::new(residues).map_err(|e| CliError::Engine(EngineError::from(e)))
}

pub fn read_residue_file(path: &Path) -> Result<ResidueSet> {
    info!("Loading residue table from {:?}", path);
    let file = std::fs::File::open(path)?;
    read_residues(file).map_err(|e| match e {
        CliError::Csv(source) => CliError::FileParsing {
            path: path.to_path_buf(),
            source: source.into(),
        },
        other => other,
    })
}

/// Reads one sequence per non-empty line. Lines starting with `>` or `#` are skipped.
pub fn read_sequence_file(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('>') && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
chain_id,seq_index,code,x,y,z,cx,cy,cz
# chain A
A,1,L,0.0,0.0,0.0,0.5,0.5,0.5
A,2,k,3.8,0.0,0.0,,,
B,1,D,0.0,6.0,0.0
";

    #[test]
    fn table_rows_become_residues() {
        let set = read_residues(TABLE.as_bytes()).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.chain_ids(), vec!['A', 'B']);

        let first = &set.residues()[0];
        assert_eq!(first.code(), 'L');
        assert_eq!(first.centroid(), Some(&Point3::new(0.5, 0.5, 0.5)));
        assert_eq!(first.position(), Some(Point3::new(0.5, 0.5, 0.5)));

        let second = &set.residues()[1];
        assert_eq!(second.code(), 'K');
        assert!(second.centroid().is_none());
        assert_eq!(second.position(), Some(Point3::new(3.8, 0.0, 0.0)));
    }

    #[test]
    fn partial_centroid_is_rejected() {
        let table = "chain_id,seq_index,code,x,y,z,cx,cy,cz\nA,1,L,0,0,0,1,,\n";
        assert!(matches!(
            read_residues(table.as_bytes()),
            Err(CliError::Argument(_))
        ));
    }

    #[test]
    fn malformed_numbers_are_csv_errors() {
        let table = "chain_id,seq_index,code,x,y,z\nA,one,L,0,0,0\n";
        assert!(matches!(read_residues(table.as_bytes()), Err(CliError::Csv(_))));
    }

    #[test]
    fn duplicate_residues_are_invalid_residue_data() {
        let table = "chain_id,seq_index,code,x,y,z\nA,1,L,0,0,0\nA,1,K,1,0,0\n";
        let err = read_residues(table.as_bytes()).unwrap_err();
        assert!(matches!(&err, CliError::Engine(e) if e.kind() == "InvalidResidueData"));
    }

    #[test]
    fn sequence_file_skips_headers_and_blanks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("peptides.txt");
        std::fs::write(&path, "# candidates\n>first\nKLWS\n\n  DEDEDEDE  \n").unwrap();
        assert_eq!(read_sequence_file(&path).unwrap(), vec!["KLWS", "DEDEDEDE"]);
    }
}
