//! Writes and inspects geode mesh files.

mod cli;

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    process::ExitCode,
};

use clap::Parser;
use geode::{
    bounds::Bounds,
    layout::LayoutError,
    ser::{MeshWriter, WriteError},
    texture::{TextureError, TextureInfo},
    util::{calc_tangents, check_avail_transient_buffers, encode_normal_rgba8, TangentError},
    AttributeComponent, AttributeType, AttributeUsage, BackendError, Mesh, MeshState,
    MeshStateError, PrimitiveDesc, ProgramHandle, RecordingBackend, RenderState, TextureBinding,
    TextureCache, UniformHandle, VertexLayout,
};
use nalgebra::Matrix4;

use cli::{Cli, Command};

#[derive(Debug, thiserror::Error)]
enum Error {
    #[error(transparent)]
    Load(#[from] geode::Error),
    #[error(transparent)]
    Write(#[from] WriteError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Tangents(#[from] TangentError),
    #[error(transparent)]
    Texture(#[from] TextureError<BackendError>),
    #[error(transparent)]
    State(#[from] MeshStateError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// position, normal, tangent, uv
const DEMO_FLOATS: usize = 3 + 3 + 4 + 2;

fn demo_layout() -> Result<VertexLayout, LayoutError> {
    VertexLayout::builder()
        .add(AttributeUsage::Position, AttributeType::Vec3, AttributeComponent::F32, false)
        .add(AttributeUsage::Normal, AttributeType::Vec3, AttributeComponent::F32, false)
        .add(AttributeUsage::Tangent, AttributeType::Vec4, AttributeComponent::F32, false)
        .add(AttributeUsage::Texcoord(0), AttributeType::Vec2, AttributeComponent::F32, false)
        .add(AttributeUsage::Color(0), AttributeType::Vec4, AttributeComponent::U8, true)
        .build()
}

/// Vertex data of a unit quad facing +Z, offset by `x`.
fn quad_vertices(x: f32) -> Vec<u8> {
    let color = encode_normal_rgba8(0.0, 0.0, 1.0, 1.0);
    [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]
        .into_iter()
        .flat_map(|[u, v]| {
            let floats: [f32; DEMO_FLOATS] =
                [x + u, v, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, u, v];
            let mut vertex = floats
                .iter()
                .flat_map(|f| f.to_le_bytes())
                .collect::<Vec<u8>>();
            vertex.extend_from_slice(&color.to_le_bytes());
            vertex
        })
        .collect()
}

fn demo(groups: u16, output: &Path) -> Result<(), Error> {
    let layout = demo_layout()?;
    let indices = [0u16, 1, 2, 0, 2, 3];
    let mut writer = MeshWriter::new(BufWriter::new(File::create(output)?));
    writer.write_layout(&layout)?;
    for g in 0..groups {
        let mut vertices = quad_vertices(g as f32 * 2.0);
        calc_tangents(&mut vertices, 4, &layout, &indices)?;
        let primitives = [
            PrimitiveDesc {
                name: "lower".into(),
                start_index: 0,
                num_indices: 3,
                start_vertex: 0,
                num_vertices: 3,
            },
            PrimitiveDesc {
                name: "upper".into(),
                start_index: 3,
                num_indices: 3,
                start_vertex: 0,
                num_vertices: 4,
            },
        ];
        writer.write_group(&layout, &vertices, &indices, &format!("quad{g}"), &primitives)?;
    }
    writer.into_inner().flush()?;
    tracing::info!(groups, path = %output.display(), "wrote demo mesh");
    Ok(())
}

fn describe_bounds(b: &Bounds<f32>) -> String {
    let (min, max) = (&b.aabb.mins, &b.aabb.maxs);
    let c = &b.sphere.center;
    format!(
        "aabb ({:.3}, {:.3}, {:.3})..({:.3}, {:.3}, {:.3}), sphere ({:.3}, {:.3}, {:.3}) r {:.3}",
        min.x, min.y, min.z, max.x, max.y, max.z, c.x, c.y, c.z, b.sphere.radius
    )
}

fn inspect_file(
    path: &Path,
    backend: &mut RecordingBackend,
    textures: &mut TextureCache,
    ram_copy: bool,
    passes: u8,
    transform: &Matrix4<f32>,
) -> Result<(), Error> {
    // every pass but the last writes depth only; the last samples a texture named after the file
    let name = path.display().to_string();
    let texture = textures.get_or_insert_with(&name, || {
        let info = TextureInfo {
            width: 1,
            height: 1,
            is_cube_map: false,
        };
        backend.create_texture(1, 1).map(|handle| (handle, info))
    })?;
    let states: Vec<MeshState> = (0..passes)
        .map(|pass| {
            let state = MeshState::new(ProgramHandle::new(pass as u16), pass as u16);
            if pass + 1 < passes {
                Ok(state.with_state(RenderState::WRITE_Z | RenderState::DEPTH_TEST_LESS))
            } else {
                state.with_texture(TextureBinding {
                    stage: 0,
                    sampler: UniformHandle::new(0),
                    texture: textures.handle(texture),
                    flags: 0,
                })
            }
        })
        .collect::<Result<_, _>>()?;

    let mut mesh = Mesh::from_path(path, backend, ram_copy)?;
    println!(
        "{}: {} groups, {} vertices ({} bytes each), {} indices",
        path.display(),
        mesh.groups().len(),
        mesh.num_vertices(),
        mesh.layout().stride(),
        mesh.num_indices()
    );
    for attr in mesh.layout().attributes() {
        println!(
            "  attribute {} at {}: {:?} x {:?}{}",
            attr.usage,
            attr.offset,
            attr.ty,
            attr.component,
            if attr.normalized { " (normalized)" } else { "" }
        );
    }
    for (i, group) in mesh.groups().iter().enumerate() {
        let transient = check_avail_transient_buffers(
            &*backend,
            group.num_vertices(),
            mesh.layout(),
            group.num_indices(),
        );
        println!(
            "  group {i} '{}': {} vertices, {} indices, {}{}",
            group.material(),
            group.num_vertices(),
            group.num_indices(),
            describe_bounds(group.bounds()),
            if transient { "" } else { " (too large for transient buffers)" }
        );
        for prim in group.primitives() {
            println!(
                "    primitive '{}': indices {:?}, vertices {:?}, {}",
                prim.name(),
                prim.index_range(),
                prim.vertex_range(),
                describe_bounds(prim.bounds())
            );
        }
    }

    let state_refs: Vec<&MeshState> = states.iter().collect();
    let draws = mesh.submit_passes(backend, &state_refs, std::slice::from_ref(transform));
    println!("  {passes} passes: {draws} draw calls");
    for view in backend.views().collect::<Vec<_>>() {
        println!("    view {view}: {} draws", backend.draws(view).len());
    }
    backend.frame();

    textures.release(texture, backend);
    mesh.unload(backend);
    Ok(())
}

fn run(command: Command) -> Result<(), Error> {
    match command {
        Command::Demo { groups, output } => demo(groups, &output),
        Command::Inspect {
            ram_copy,
            passes,
            translate,
            files,
        } => {
            let mut backend = RecordingBackend::default();
            let mut textures = TextureCache::new();
            let transform = Matrix4::new_translation(&translate);
            let res = files.iter().try_for_each(|path| {
                inspect_file(path, &mut backend, &mut textures, ram_copy, passes, &transform)
            });
            textures.clear(&mut backend);
            let stats = backend.stats();
            tracing::info!(
                vertex_buffers = stats.vertex_buffers_created,
                index_buffers = stats.index_buffers_created,
                textures = stats.textures_created,
                live = backend.live_buffers() + backend.live_textures(),
                "recording backend totals"
            );
            res
        }
    }
}

pub fn main() -> ExitCode {
    let cli = Cli::parse();
    cli::initialize_tracing(&cli.log_filter, cli.log_format);
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "meshinfo failed");
            ExitCode::FAILURE
        }
    }
}
