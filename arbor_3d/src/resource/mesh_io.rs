//! Binary mesh import/export.
//!
//! Big-endian, every array length-prefixed with an `i32` element count
//! (0 means absent):
//!
//! ```text
//! i32        draw mode (GL enumerant)
//! i32        vertex count
//! i32        center flag   [+ 3 × f32 when 1]
//! i32        bound flag    [+ 6 × f32 min.xyz max.xyz when 1]
//! i32 + u16  indices
//! i32 + f32  vertices
//! i32 + f32  texture coordinates
//! i32 + f32  normals
//! ```
//!
//! Colors are not part of the format. Import validates array lengths only.

use std::io::{Read, Write};
use glam::Vec3;
use crate::error::Result;
use crate::engine_bail;
use crate::intersection::BoundingBox;
use super::geometry_buffer::{GeometryBuffer, DrawMode};

// ===== EXPORT =====

/// Write `geometry`'s arrays to `writer`.
///
/// The model bound is written only when it is current (not dirty) and set.
pub fn export_geometry<W: Write>(geometry: &GeometryBuffer, writer: &mut W) -> Result<()> {
    write_i32(writer, geometry.draw_mode().gl_code())?;
    write_i32(writer, len_i32(geometry.vertex_count())?)?;

    match geometry.center() {
        Some(center) => {
            write_i32(writer, 1)?;
            write_f32s(writer, &center.to_array())?;
        }
        None => write_i32(writer, 0)?,
    }

    let bound = geometry.model_bound();
    if !geometry.has_dirty_model_bound() && bound.is_set() {
        write_i32(writer, 1)?;
        write_f32s(writer, &bound.to_array())?;
    } else {
        write_i32(writer, 0)?;
    }

    let indices = geometry.indices().unwrap_or_default();
    write_i32(writer, len_i32(indices.len())?)?;
    for index in indices {
        writer.write_all(&index.to_be_bytes())?;
    }

    for array in [geometry.vertices(), geometry.texcoords(), geometry.normals()] {
        let array = array.unwrap_or_default();
        write_i32(writer, len_i32(array.len())?)?;
        write_f32s(writer, array)?;
    }
    Ok(())
}

// ===== IMPORT =====

/// Read a geometry previously written by [`export_geometry`]
///
/// # Errors
///
/// `Io` on stream failure, `InvalidInput` on an unknown draw mode or an
/// array length inconsistent with the vertex count.
pub fn import_geometry<R: Read>(reader: &mut R, name: &str) -> Result<GeometryBuffer> {
    let code = read_i32(reader)?;
    let Some(draw_mode) = DrawMode::from_gl_code(code) else {
        engine_bail!("arbor3d::mesh_io", InvalidInput => "Unknown draw mode {:#x} in {}", code, name);
    };
    let vertex_count = read_len(reader, name)?;

    let center = match read_i32(reader)? {
        0 => None,
        _ => Some(Vec3::from_array(read_f32_array::<_, 3>(reader)?)),
    };
    let bound = match read_i32(reader)? {
        0 => None,
        _ => {
            let v = read_f32_array::<_, 6>(reader)?;
            Some(BoundingBox::from_values(v[0], v[1], v[2], v[3], v[4], v[5]))
        }
    };

    let index_len = read_len(reader, name)?;
    let mut indices = Vec::with_capacity(index_len.min(1 << 16));
    for _ in 0..index_len {
        let mut bytes = [0u8; 2];
        reader.read_exact(&mut bytes)?;
        indices.push(u16::from_be_bytes(bytes));
    }
    let vertices = read_f32_block(reader, name)?;
    let texcoords = read_f32_block(reader, name)?;
    let normals = read_f32_block(reader, name)?;

    if vertices.len() != vertex_count * 3 {
        engine_bail!("arbor3d::mesh_io", InvalidInput =>
            "Vertex array length {} does not match vertex count {} in {}",
            vertices.len(), vertex_count, name);
    }

    let mut geometry = GeometryBuffer::new(name);
    geometry.set_draw_mode(draw_mode)?;
    geometry.set_center(center)?;
    if !vertices.is_empty() {
        geometry.set_vertices(&vertices)?;
    }
    if !indices.is_empty() {
        geometry.set_indices(&indices)?;
    }
    if !texcoords.is_empty() {
        geometry.set_texcoords(&texcoords)?;
    }
    if !normals.is_empty() {
        geometry.set_normals(&normals)?;
    }
    if let Some(bound) = bound {
        geometry.set_model_bound(bound)?;
    }
    Ok(geometry)
}

// ===== PRIMITIVES =====

fn len_i32(len: usize) -> Result<i32> {
    match i32::try_from(len) {
        Ok(len) => Ok(len),
        Err(_) => engine_bail!("arbor3d::mesh_io", InvalidInput => "Array of {} elements is too large", len),
    }
}

fn write_i32<W: Write>(writer: &mut W, value: i32) -> Result<()> {
    writer.write_all(&value.to_be_bytes())?;
    Ok(())
}

fn write_f32s<W: Write>(writer: &mut W, values: &[f32]) -> Result<()> {
    for value in values {
        writer.write_all(&value.to_be_bytes())?;
    }
    Ok(())
}

fn read_i32<R: Read>(reader: &mut R) -> Result<i32> {
    let mut bytes = [0u8; 4];
    reader.read_exact(&mut bytes)?;
    Ok(i32::from_be_bytes(bytes))
}

fn read_f32<R: Read>(reader: &mut R) -> Result<f32> {
    let mut bytes = [0u8; 4];
    reader.read_exact(&mut bytes)?;
    Ok(f32::from_be_bytes(bytes))
}

fn read_f32_array<R: Read, const N: usize>(reader: &mut R) -> Result<[f32; N]> {
    let mut values = [0.0; N];
    for value in values.iter_mut() {
        *value = read_f32(reader)?;
    }
    Ok(values)
}

fn read_len<R: Read>(reader: &mut R, name: &str) -> Result<usize> {
    let len = read_i32(reader)?;
    match usize::try_from(len) {
        Ok(len) => Ok(len),
        Err(_) => engine_bail!("arbor3d::mesh_io", InvalidInput => "Negative length {} in {}", len, name),
    }
}

fn read_f32_block<R: Read>(reader: &mut R, name: &str) -> Result<Vec<f32>> {
    let len = read_len(reader, name)?;
    let mut values = Vec::with_capacity(len.min(1 << 16));
    for _ in 0..len {
        values.push(read_f32(reader)?);
    }
    Ok(values)
}

#[cfg(test)]
#[path = "mesh_io_tests.rs"]
mod tests;
