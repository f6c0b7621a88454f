use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, ensure, Context, Result};
use csv::ReaderBuilder;

use crate::types::{Landmark, LandmarkSet, NUM_LANDMARKS};

/// Carga una sesión grabada en el formato frame,landmark,x,y (una fila por
/// landmark). Cada hueco de frames ausentes se devuelve como un único frame
/// vacío (sin mano detectada).
pub fn load_frames_from_csv(path: impl AsRef<Path>) -> Result<Vec<LandmarkSet>> {
    let path = path.as_ref();
    let reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("No se pudo abrir el CSV {:?}", path))?;
    read_frames(reader).with_context(|| format!("Sesión inválida en {:?}", path))
}

pub fn load_frames_from_reader<R: Read>(input: R) -> Result<Vec<LandmarkSet>> {
    let reader = ReaderBuilder::new().has_headers(true).from_reader(input);
    read_frames(reader)
}

fn read_frames<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<LandmarkSet>> {
    let mut frames: BTreeMap<usize, BTreeMap<usize, Landmark>> = BTreeMap::new();

    for (row_idx, result) in reader.records().enumerate() {
        let row = row_idx + 1;
        let record = result.with_context(|| format!("Fila {} inválida", row))?;
        if record.len() < 4 {
            bail!("La fila {} no tiene 4 columnas", row);
        }

        let frame: usize = record[0]
            .trim()
            .parse()
            .with_context(|| format!("frame inválido en fila {}", row))?;
        let landmark: usize = record[1]
            .trim()
            .parse()
            .with_context(|| format!("landmark inválido en fila {}", row))?;
        ensure!(
            landmark < NUM_LANDMARKS,
            "Landmark {} fuera de rango (fila {})",
            landmark,
            row
        );

        let x: f32 = record[2]
            .trim()
            .parse()
            .with_context(|| format!("x inválida en fila {}", row))?;
        let y: f32 = record[3]
            .trim()
            .parse()
            .with_context(|| format!("y inválida en fila {}", row))?;

        frames
            .entry(frame)
            .or_default()
            .insert(landmark, Landmark::new(x, y));
    }

    // Un hueco, sea del tamaño que sea, se reduce a un solo frame vacío
    let mut out = Vec::with_capacity(frames.len());
    let mut prev: Option<usize> = None;
    for (frame_idx, points) in frames {
        if prev.is_some_and(|p| frame_idx - p > 1) {
            out.push(Vec::new());
        }
        // Una mano incompleta se deja incompleta para que se descarte al clasificar
        out.push(points.into_values().collect());
        prev = Some(frame_idx);
    }

    Ok(out)
}
