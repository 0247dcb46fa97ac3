//! Mesh streams for the integration tests.
#![allow(dead_code)]

use std::io::Cursor;

use geode::{
    ser::MeshWriter, AttributeComponent, AttributeType, AttributeUsage, PrimitiveDesc,
    VertexLayout,
};

/// `f32` position followed by a packed RGBA8 normal.
pub fn layout() -> VertexLayout {
    VertexLayout::builder()
        .add(AttributeUsage::Position, AttributeType::Vec3, AttributeComponent::F32, false)
        .add(AttributeUsage::Normal, AttributeType::Vec4, AttributeComponent::U8, true)
        .build()
        .unwrap()
}

#[derive(Debug, Clone, Default)]
pub struct GroupData {
    pub material: String,
    pub positions: Vec<[f32; 3]>,
    pub indices: Vec<u16>,
    pub primitives: Vec<PrimitiveDesc>,
}

impl GroupData {
    /// Interleaved vertex bytes in the shape of [layout].
    pub fn vertex_bytes(&self) -> Vec<u8> {
        let normal = geode::util::encode_normal_rgba8(0.0, 0.0, 1.0, 0.0);
        self.positions
            .iter()
            .flat_map(|p| {
                let mut v = bytemuck::bytes_of(p).to_vec();
                v.extend_from_slice(&normal.to_le_bytes());
                v
            })
            .collect()
    }

    /// A unit quad: 4 vertices, 2 triangles, one primitive spanning everything.
    pub fn quad(material: &str) -> Self {
        Self {
            material: material.into(),
            positions: vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ],
            indices: vec![0, 1, 2, 0, 2, 3],
            primitives: vec![PrimitiveDesc {
                name: "quad".into(),
                start_index: 0,
                num_indices: 6,
                start_vertex: 0,
                num_vertices: 4,
            }],
        }
    }

    /// A group drawing `positions` as points, split into two primitives.
    pub fn points(material: &str, positions: Vec<[f32; 3]>) -> Self {
        let n = positions.len() as u32;
        let half = n / 2;
        let primitives = [(0, half), (half, n - half)]
            .into_iter()
            .enumerate()
            .map(|(i, (start, len))| PrimitiveDesc {
                name: format!("part{i}"),
                start_index: start,
                num_indices: len,
                start_vertex: start,
                num_vertices: len,
            })
            .collect();
        Self {
            material: material.into(),
            indices: (0..n as u16).collect(),
            positions,
            primitives,
        }
    }
}

/// Convert small integer coordinates into positions; keeps generated data finite.
pub fn positions(points: &[(i16, i16, i16)]) -> Vec<[f32; 3]> {
    points
        .iter()
        .map(|&(x, y, z)| [x as f32 / 8.0, y as f32 / 8.0, z as f32 / 8.0])
        .collect()
}

/// Write a layout chunk, then each group.
pub fn encode(groups: &[GroupData]) -> Vec<u8> {
    let layout = layout();
    let mut writer = MeshWriter::new(Vec::new());
    writer.write_layout(&layout).unwrap();
    for g in groups {
        writer
            .write_group(&layout, &g.vertex_bytes(), &g.indices, &g.material, &g.primitives)
            .unwrap();
    }
    writer.into_inner()
}

pub fn stream(groups: &[GroupData]) -> Cursor<Vec<u8>> {
    Cursor::new(encode(groups))
}
