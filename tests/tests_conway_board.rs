//! End-to-end generation of a Game of Life board from a configuration file

use gridcore::config::load_config;
use gridcore::dsg::{
    artifact_path, binary_fingerprint, DataSpecReader, RecordingConfig, RecordingHeader, RunLength,
    SystemRegion,
};
use gridcore::frontend::models::{CellRegion, PARTITION_ID};
use gridcore::frontend::{
    generate, generate_all, required_resources, BatchOptions, ConwayBasicCell, ConwayGrid,
    DataSpecable, GenerationErrorKind, VertexFailure,
};
use gridcore::graph::{GraphQuery, TopologyError};
use std::collections::HashMap;
use std::fs;

fn write_config(dir: &std::path::Path, run_root: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("gridcore_configuration.toml");
    fs::write(
        &path,
        format!(
            r#"
[machine]
hostname = "192.168.240.1"
machine_time_step = 1000

[buffers]
enable_buffered_recording = true
buffer_size_before_receive = 1024
time_between_requests = 25
receive_buffer_host = "10.11.12.13"
receive_buffer_port = 17895
max_channel_buffer_bytes = 2048

[reports]
application_data_folder = "{}"
write_text_specs = true

[generation]
max_workers = 3
"#,
            run_root.display()
        ),
    )
    .unwrap();
    path
}

/// Board where cell (2, 2) sees five live and three dead neighbours
fn board() -> ConwayGrid {
    let alive = [(1, 1), (2, 1), (3, 1), (1, 2), (3, 2), (2, 2)];
    ConwayGrid::torus(5, 5, 1000, "192.168.240.1", |x, y| alive.contains(&(x, y))).unwrap()
}

#[test]
fn configured_batch_writes_every_cell() {
    let dir = tempfile::tempdir().unwrap();
    let run_root = dir.path().join("run");
    let config = load_config(Some(&write_config(dir.path(), &run_root)), None).unwrap();
    let recording = RecordingConfig::from_buffers(&config.buffers).unwrap();
    let grid = board();

    let report = generate_all(
        &grid.graph,
        &grid.routing,
        &grid.placements,
        &recording,
        &BatchOptions::from_config(&config),
    )
    .unwrap();
    assert!(report.is_complete());
    assert_eq!(report.outcomes.len(), 25);

    let centre = grid.cell_id(2, 2);
    let placement = grid.placements.get(centre).unwrap();
    let paths = artifact_path(
        &placement.hostname,
        placement.x,
        placement.y,
        placement.p,
        run_root.to_str().unwrap(),
        true,
    );
    let bytes = fs::read(&paths.binary).unwrap();
    let cell = grid.graph.vertex(centre).unwrap();
    let layout = cell.region_layout(&recording).unwrap();
    let reader = DataSpecReader::new(&bytes, &layout).unwrap();

    let system = SystemRegion::decode(0, reader.region(CellRegion::System.id()).unwrap()).unwrap();
    assert_eq!(system.fingerprint, binary_fingerprint("conways_cell"));
    assert_eq!(system.run_length, RunLength::Indefinite);
    assert_eq!(reader.words(CellRegion::Transmissions.id()).unwrap(), vec![1, centre.0 as u32]);
    assert_eq!(reader.words(CellRegion::State.id()).unwrap(), vec![1]);
    assert_eq!(reader.words(CellRegion::NeighbourInitialStates.id()).unwrap(), vec![5, 3]);

    let header = RecordingHeader::decode(4, reader.region(CellRegion::Results.id()).unwrap()).unwrap();
    assert_eq!(header.time_between_requests(), 25);
    assert_eq!(header.buffer_size_before_receive(), Some(1024));
    assert!(header.channels()[0].buffered);
    assert_eq!(header.channels()[0].endpoint.port, 17895);

    let text = fs::read_to_string(paths.text.unwrap()).unwrap();
    assert!(text.lines().all(|line| line.starts_with("region ")));
}

#[test]
fn cli_overrides_reach_the_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let run_root = dir.path().join("configured");
    let overridden = dir.path().join("overridden");
    let mut cli = HashMap::new();
    cli.insert("app_data_folder".to_string(), overridden.to_str().unwrap().to_string());
    cli.insert("write_text_specs".to_string(), "false".to_string());

    let config = load_config(Some(&write_config(dir.path(), &run_root)), Some(&cli)).unwrap();
    let recording = RecordingConfig::from_buffers(&config.buffers).unwrap();
    let grid = board();

    let report = generate_all(
        &grid.graph,
        &grid.routing,
        &grid.placements,
        &recording,
        &BatchOptions::from_config(&config),
    )
    .unwrap();

    assert_eq!(report.succeeded().count(), 25);
    assert!(!run_root.exists());
    assert!(overridden.join("192.168.240.1_dataSpec_0_0_1.dat").exists());
    assert!(!overridden.join("data_spec_text_files").exists());
}

#[test]
fn resources_match_blob_for_every_cell() {
    let grid = board();
    let recording = RecordingConfig {
        max_channel_buffer_bytes: 1024,
        ..RecordingConfig::default()
    };

    for id in grid.graph.vertex_ids() {
        let bytes = generate(id, &grid.graph, &grid.routing, grid.placements.get(id).unwrap(), &recording).unwrap();
        let cell = grid.graph.vertex(id).unwrap();
        assert_eq!(required_resources(cell, &recording).unwrap().sdram_bytes as usize, bytes.len());
    }
}

#[test]
fn miswired_cell_is_skipped_without_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let mut grid = board();
    let victim = grid.cell_id(0, 0);
    grid.graph.add_edge(grid.cell_id(2, 2), victim, PARTITION_ID).unwrap();

    let options = BatchOptions {
        max_workers: 0,
        run_root: dir.path().to_str().unwrap().to_string(),
        write_text_specs: false,
    };
    let recording = RecordingConfig {
        max_channel_buffer_bytes: 256,
        ..RecordingConfig::default()
    };
    let report = generate_all(&grid.graph, &grid.routing, &grid.placements, &recording, &options).unwrap();

    let failed: Vec<_> = report.failed().collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].vertex, victim);
    match &failed[0].result {
        Err(VertexFailure::Generation(e)) => {
            assert_eq!(
                e.kind,
                GenerationErrorKind::Topology(TopologyError::TopologyMismatch {
                    expected: 8,
                    observed: 9
                })
            );
            assert!(e.to_string().contains('9'));
        }
        other => panic!("unexpected outcome {:?}", other),
    }

    let placement = grid.placements.get(victim).unwrap();
    let paths = artifact_path(&placement.hostname, placement.x, placement.y, placement.p, options.run_root.as_str(), false);
    assert!(!paths.binary.exists());
    assert_eq!(report.succeeded().count(), 24);
}

#[test]
fn run_length_is_fixed_once_per_cell() {
    let mut cell = ConwayBasicCell::new("solo", true, 1000);
    cell.simulator_mut().set_run_length(RunLength::Steps(100)).unwrap();
    assert!(cell.simulator_mut().set_run_length(RunLength::Indefinite).is_err());
    assert_eq!(cell.simulator().run_length(), RunLength::Steps(100));
}
