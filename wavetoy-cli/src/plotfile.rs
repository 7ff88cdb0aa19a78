use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use wavetoy_core::{Component, IndexBox, PlotFrame, PlotSink};

/// Writes each frame as a directory holding `Header.json` and `Level_0.bin`.
///
/// `Level_0.bin` is little-endian f64: for each patch, for each component,
/// the interior cells with x fastest. `Header.json` records where each patch
/// starts.
pub struct PlotfileWriter {
    root: PathBuf,
    written: Vec<PathBuf>,
}

#[derive(Serialize)]
struct Header<'a> {
    name: &'a str,
    iteration: u64,
    time: f64,
    components: [&'static str; 4],

    lo: [f64; 3],
    hi: [f64; 3],
    ncells: usize,
    dx: [f64; 3],
    periodic: [bool; 3],

    patches: Vec<PatchHeader>,
}

#[derive(Serialize)]
struct PatchHeader {
    id: usize,
    #[serde(rename = "box")]
    valid: IndexBox,
    byte_offset: u64,
}

impl PlotfileWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            written: Vec::new(),
        }
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl PlotSink for PlotfileWriter {
    fn write_plotfile(&mut self, frame: &PlotFrame<'_>) -> std::io::Result<()> {
        let dir = self.root.join(&frame.name);
        fs::create_dir_all(&dir)?;

        let mut data = BufWriter::new(File::create(dir.join("Level_0.bin"))?);
        let mut patches = Vec::with_capacity(frame.patches().len());
        let mut offset = 0u64;
        for p in frame.patches() {
            patches.push(PatchHeader {
                id: p.id(),
                valid: p.valid_box(),
                byte_offset: offset,
            });
            for c in Component::ALL {
                for v in p.interior_values(c) {
                    data.write_all(&v.to_le_bytes())?;
                }
            }
            offset += (p.valid_box().volume() * Component::ALL.len() * 8) as u64;
        }
        data.flush()?;

        let d = frame.domain;
        let header = Header {
            name: &frame.name,
            iteration: frame.iteration,
            time: frame.time,
            components: frame.component_names(),
            lo: d.lo,
            hi: d.hi,
            ncells: d.ncells,
            dx: d.dx(),
            periodic: d.periodic,
            patches,
        };
        let mut hw = BufWriter::new(File::create(dir.join("Header.json"))?);
        serde_json::to_writer_pretty(&mut hw, &header)?;
        hw.write_all(b"\n")?;
        hw.flush()?;

        self.written.push(dir);
        Ok(())
    }
}
