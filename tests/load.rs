#![cfg(feature = "serialize")]

mod common;

use std::io::Cursor;

use common::{encode, positions, stream, GroupData};
use geode::{
    backend::{BackendLimits, ResourceKind},
    de::ChunkTag,
    ser::MeshWriter,
    BackendError, Error, Mesh, ParseError, PrimitiveDesc, RecordingBackend, ResourceError,
};
use quickcheck_macros::quickcheck;

fn assert_no_leaks(backend: &RecordingBackend) {
    let stats = backend.stats();
    assert_eq!(backend.live_buffers(), 0);
    assert_eq!(stats.vertex_buffers_created, stats.vertex_buffers_destroyed);
    assert_eq!(stats.index_buffers_created, stats.index_buffers_destroyed);
}

#[test]
fn single_quad() {
    let mut backend = RecordingBackend::default();
    let mut mesh = Mesh::load(stream(&[GroupData::quad("brick")]), &mut backend, false).unwrap();

    assert_eq!(mesh.groups().len(), 1);
    let group = &mesh.groups()[0];
    assert_eq!(group.material(), "brick");
    assert_eq!(group.num_vertices(), 4);
    assert_eq!(group.num_indices(), 6);
    assert!(group.vertex_buffer().is_valid());
    assert!(group.index_buffer().is_valid());
    assert_eq!(backend.vertex_buffer_size(group.vertex_buffer()), Some(4 * 16));
    assert_eq!(backend.index_buffer_size(group.index_buffer()), Some(6 * 2));

    let [prim] = group.primitives() else {
        panic!("expected one primitive, found {}", group.primitives().len());
    };
    assert_eq!(prim.name(), "quad");
    assert_eq!(prim.start_vertex(), 0);
    assert_eq!(prim.num_vertices(), 4);
    assert_eq!(prim.start_index(), 0);
    assert_eq!(prim.num_indices(), 6);
    assert_eq!(backend.live_buffers(), 2);

    mesh.unload(&mut backend);
    assert_no_leaks(&backend);
}

#[quickcheck]
fn load_unload_leaves_nothing(groups: Vec<Vec<(i16, i16, i16)>>) -> bool {
    let groups: Vec<_> = groups
        .iter()
        .enumerate()
        .map(|(i, points)| GroupData::points(&format!("g{i}"), positions(points)))
        .collect();
    let mut backend = RecordingBackend::default();
    let mut mesh = match Mesh::load(stream(&groups), &mut backend, false) {
        Ok(mesh) => mesh,
        Err(_) => return false,
    };
    mesh.unload(&mut backend);
    backend.live_buffers() == 0 && mesh.groups().is_empty()
}

#[quickcheck]
fn groups_keep_stream_order(groups: Vec<Vec<(i16, i16, i16)>>) -> bool {
    let groups: Vec<_> = groups
        .iter()
        .enumerate()
        .map(|(i, points)| GroupData::points(&format!("g{i}"), positions(points)))
        .collect();
    let mut backend = RecordingBackend::default();
    let Ok(mut mesh) = Mesh::load(stream(&groups), &mut backend, false) else {
        return false;
    };
    let res = mesh.groups().len() == groups.len()
        && mesh
            .groups()
            .iter()
            .zip(&groups)
            .all(|(loaded, data)| {
                loaded.material() == data.material
                    && loaded.num_vertices() as usize == data.positions.len()
            });
    mesh.unload(&mut backend);
    res
}

#[test]
fn unload_is_idempotent() {
    let mut backend = RecordingBackend::default();
    let groups = [GroupData::quad("a"), GroupData::quad("b")];
    let mut mesh = Mesh::load(stream(&groups), &mut backend, true).unwrap();
    mesh.unload(&mut backend);
    let stats = *backend.stats();
    mesh.unload(&mut backend);
    assert_eq!(*backend.stats(), stats);
    assert!(mesh.groups().is_empty());
    assert_no_leaks(&backend);

    // never loaded
    Mesh::default().unload(&mut backend);
    assert_eq!(*backend.stats(), stats);
}

#[test]
fn unknown_chunk_after_valid_groups() {
    let mut data = encode(&[GroupData::quad("a"), GroupData::quad("b")]);
    let offset = data.len() as u64;
    let mut writer = MeshWriter::new(&mut data);
    writer.write_chunk(ChunkTag(*b"JUNK"), &[0; 8]).unwrap();

    let mut backend = RecordingBackend::default();
    let res = Mesh::load(Cursor::new(data), &mut backend, false);
    assert!(matches!(
        res,
        Err(Error::Parse(ParseError::UnknownChunk { tag: ChunkTag(t), offset: o }))
            if &t == b"JUNK" && o == offset
    ));
    assert_eq!(backend.stats().vertex_buffers_created, 2);
    assert_no_leaks(&backend);
}

#[test]
fn backend_refusal_rolls_back() {
    let mut backend = RecordingBackend::new(BackendLimits {
        max_index_buffers: 1,
        ..Default::default()
    });
    let groups = [GroupData::quad("a"), GroupData::quad("b")];
    let res = Mesh::load(stream(&groups), &mut backend, false);
    match res {
        Err(Error::Resource(ResourceError {
            kind: ResourceKind::IndexBuffer,
            group: 1,
            source: BackendError::OutOfHandles { capacity: 1, .. },
        })) => {}
        other => panic!("expected an index buffer failure, got {other:?}"),
    }
    assert_no_leaks(&backend);
}

#[test]
fn vertex_buffer_refusal_rolls_back_earlier_groups() {
    let mut backend = RecordingBackend::new(BackendLimits {
        max_vertex_buffers: 1,
        ..Default::default()
    });
    let groups = [GroupData::quad("a"), GroupData::quad("b"), GroupData::quad("c")];
    match Mesh::load(stream(&groups), &mut backend, true) {
        Err(Error::Resource(ResourceError {
            kind: ResourceKind::VertexBuffer,
            group: 1,
            source: BackendError::OutOfHandles { capacity: 1, .. },
        })) => {}
        other => panic!("expected a vertex buffer failure, got {other:?}"),
    }
    let stats = backend.stats();
    assert_eq!(stats.vertex_buffers_created, 1);
    assert_eq!(stats.index_buffers_created, 1);
    assert_no_leaks(&backend);
}

#[test]
fn truncated_stream() {
    let mut data = encode(&[GroupData::quad("a")]);
    data.truncate(data.len() - 3);
    let mut backend = RecordingBackend::default();
    assert!(matches!(
        Mesh::load(Cursor::new(data), &mut backend, false),
        Err(Error::Parse(ParseError::Truncated { .. }))
    ));
    assert_no_leaks(&backend);
}

#[test]
fn empty_stream_has_no_layout() {
    let mut backend = RecordingBackend::default();
    assert!(matches!(
        Mesh::load(Cursor::new(Vec::new()), &mut backend, false),
        Err(Error::Parse(ParseError::MissingLayout))
    ));
}

#[test]
fn layout_only_stream_is_empty_mesh() {
    let mut backend = RecordingBackend::default();
    let mesh = Mesh::load(stream(&[]), &mut backend, false).unwrap();
    assert!(mesh.groups().is_empty());
    assert_eq!(mesh.layout(), &common::layout());
}

#[test]
fn group_structure_is_checked() {
    let layout = common::layout();
    let quad = GroupData::quad("a");

    let mut orphan = MeshWriter::new(Vec::new());
    orphan.write_layout(&layout).unwrap();
    orphan.write_indices(&quad.indices).unwrap();

    let mut unterminated = MeshWriter::new(Vec::new());
    unterminated.write_layout(&layout).unwrap();
    unterminated.write_vertices(&layout, &quad.vertex_bytes()).unwrap();
    unterminated.write_indices(&quad.indices).unwrap();

    let mut repeated = MeshWriter::new(Vec::new());
    repeated.write_layout(&layout).unwrap();
    repeated.write_vertices(&layout, &quad.vertex_bytes()).unwrap();
    repeated.write_vertices(&layout, &quad.vertex_bytes()).unwrap();

    let cases = [
        (orphan, ParseError::OrphanChunk(ChunkTag::INDICES)),
        (unterminated, ParseError::UnterminatedGroup),
        (repeated, ParseError::RepeatedChunk(ChunkTag::VERTICES)),
    ];
    for (writer, expected) in cases {
        let mut backend = RecordingBackend::default();
        match Mesh::load(Cursor::new(writer.into_inner()), &mut backend, false) {
            Err(Error::Parse(e)) => assert_eq!(e.to_string(), expected.to_string()),
            other => panic!("expected {expected}, got {other:?}"),
        }
        assert_no_leaks(&backend);
    }
}

#[test]
fn ranges_are_checked() {
    let mut bad_index = GroupData::quad("a");
    bad_index.indices[4] = 4;
    let mut bad_prim = GroupData::quad("b");
    bad_prim.primitives.push(PrimitiveDesc {
        name: "overhang".into(),
        start_index: 3,
        num_indices: 6,
        start_vertex: 0,
        num_vertices: 4,
    });

    let mut backend = RecordingBackend::default();
    assert!(matches!(
        Mesh::load(stream(&[GroupData::quad("ok"), bad_index]), &mut backend, false),
        Err(Error::Parse(ParseError::IndexOutOfRange {
            group: 1,
            index: 4,
            num_vertices: 4
        }))
    ));
    assert!(matches!(
        Mesh::load(stream(&[bad_prim]), &mut backend, false),
        Err(Error::Parse(ParseError::PrimitiveOutOfRange {
            group: 0,
            primitive: 1
        }))
    ));
    assert_no_leaks(&backend);
}

#[test]
fn ram_copy_policy() {
    let quad = GroupData::quad("a");
    let mut backend = RecordingBackend::default();

    let mut kept = Mesh::load(stream(&[quad.clone()]), &mut backend, true).unwrap();
    let group = &kept.groups()[0];
    assert_eq!(group.vertices(), Some(quad.vertex_bytes().as_slice()));
    assert_eq!(group.indices(), Some(quad.indices.as_slice()));

    let mut dropped = Mesh::load(stream(&[quad]), &mut backend, false).unwrap();
    assert_eq!(dropped.groups()[0].vertices(), None);
    assert_eq!(dropped.groups()[0].indices(), None);

    kept.unload(&mut backend);
    dropped.unload(&mut backend);
    assert_no_leaks(&backend);
}

#[test]
fn group_without_indices() {
    let mut group = GroupData::quad("a");
    group.indices.clear();
    group.primitives.clear();
    let mut backend = RecordingBackend::default();
    let mut mesh = Mesh::load(stream(&[group]), &mut backend, false).unwrap();
    let group = &mesh.groups()[0];
    assert!(group.vertex_buffer().is_valid());
    assert!(!group.index_buffer().is_valid());
    assert!(!group.is_drawable());
    mesh.unload(&mut backend);
    assert_no_leaks(&backend);
}

#[test]
fn from_path() {
    let path = std::env::temp_dir().join(format!("geode-from-path-{}.bin", std::process::id()));
    std::fs::write(&path, encode(&[GroupData::quad("a")])).unwrap();

    let mut backend = RecordingBackend::default();
    let res = Mesh::from_path(&path, &mut backend, false);
    std::fs::remove_file(&path).unwrap();
    let mut mesh = res.unwrap();
    assert_eq!(mesh.groups().len(), 1);
    mesh.unload(&mut backend);

    assert!(matches!(
        Mesh::from_path(&path, &mut backend, false),
        Err(Error::Io(_))
    ));
}
