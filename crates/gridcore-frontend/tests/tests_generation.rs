//! Generation of Game of Life cells on a small toroidal grid

use gridcore_dsg::{
    artifact_path, DataSpecError, DataSpecReader, RecordingConfig, RecordingHeader, RunLength,
    SystemRegion,
};
use gridcore_frontend::models::{CellRegion, PARTITION_ID};
use gridcore_frontend::{
    generate, generate_all, generate_with_report, required_resources, BatchOptions, ConwayBasicCell,
    DataSpecable, GenerationErrorKind, GenerationStage, VertexFailure,
};
use gridcore_graph::{
    GraphQuery, MachineGraph, Placement, Placements, RoutingInfo, TopologyError, VertexId,
};

const SIZE: usize = 3;

fn recording() -> RecordingConfig {
    RecordingConfig {
        max_channel_buffer_bytes: 512,
        ..RecordingConfig::default()
    }
}

/// 3x3 torus; every cell feeds the other eight
fn grid(alive: &[usize]) -> (MachineGraph<ConwayBasicCell>, RoutingInfo, Placements) {
    grid_wired(alive, |pre, post| pre != post)
}

/// Nine placed cells with an edge wherever `wired(pre, post)` holds
fn grid_wired<F>(alive: &[usize], wired: F) -> (MachineGraph<ConwayBasicCell>, RoutingInfo, Placements)
where
    F: Fn(usize, usize) -> bool,
{
    let mut graph = MachineGraph::new();
    let mut routing = RoutingInfo::new();
    let mut placements = Placements::new();

    for i in 0..SIZE * SIZE {
        let cell = ConwayBasicCell::new(format!("cell_{}", i), alive.contains(&i), 1000);
        let id = graph.add_vertex(cell);
        routing.insert(id, PARTITION_ID, 0x100 + i as u32);
        placements.insert(id, Placement::new("192.168.240.1", 0, 0, i as u32 + 1));
    }
    for pre in 0..SIZE * SIZE {
        for post in 0..SIZE * SIZE {
            if wired(pre, post) {
                graph.add_edge(VertexId(pre), VertexId(post), PARTITION_ID).unwrap();
            }
        }
    }
    (graph, routing, placements)
}

#[test]
fn cell_regions_match_its_neighbourhood() {
    let (graph, routing, placements) = grid(&[0, 1, 2, 3, 5, 4]);
    let centre = VertexId(4);
    let placement = placements.get(centre).unwrap();

    let bytes = generate(centre, &graph, &routing, placement, &recording()).unwrap();

    let cell = ConwayBasicCell::new("centre", true, 1000);
    let layout = cell.region_layout(&recording()).unwrap();
    let reader = DataSpecReader::new(&bytes, &layout).unwrap();

    let system = SystemRegion::decode(0, reader.region(CellRegion::System.id()).unwrap()).unwrap();
    assert_eq!(system.fingerprint, 0xf136558f);
    assert_eq!(system.machine_time_step, 1000);
    assert_eq!(system.run_length, RunLength::Indefinite);

    assert_eq!(reader.words(CellRegion::Transmissions.id()).unwrap(), vec![1, 0x104]);
    assert_eq!(reader.words(CellRegion::State.id()).unwrap(), vec![1]);
    // five of the eight neighbours are alive
    assert_eq!(reader.words(CellRegion::NeighbourInitialStates.id()).unwrap(), vec![5, 3]);

    let header = RecordingHeader::decode(
        CellRegion::Results.id(),
        reader.region(CellRegion::Results.id()).unwrap(),
    )
    .unwrap();
    assert_eq!(header.channels().len(), 1);
    assert_eq!(header.channels()[0].max_buffer_size, 512);
}

#[test]
fn glider_centre_with_key_42() {
    let (graph, _, placements) = grid(&[0, 1, 2, 3, 5]);
    let centre = VertexId(4);
    let mut routing = RoutingInfo::new();
    routing.insert(centre, PARTITION_ID, 42);

    let spec = generate_with_report(centre, &graph, &routing, placements.get(centre).unwrap(), &recording(), false)
        .unwrap();
    let reader = DataSpecReader::new(&spec.bytes, &spec.layout).unwrap();

    let system = SystemRegion::decode(0, reader.region(CellRegion::System.id()).unwrap()).unwrap();
    assert_eq!(system.fingerprint, 0xf136558f);
    assert_eq!(system.machine_time_step, 1000);
    assert_eq!(system.run_length, RunLength::Indefinite);
    assert_eq!(reader.words(CellRegion::Transmissions.id()).unwrap(), vec![1, 42]);
    assert_eq!(reader.words(CellRegion::State.id()).unwrap(), vec![0]);
    assert_eq!(reader.words(CellRegion::NeighbourInitialStates.id()).unwrap(), vec![5, 3]);
}

#[test]
fn missing_routing_key_writes_absent_flag() {
    let (graph, _, placements) = grid(&[]);
    let routing = RoutingInfo::new();

    let spec = generate_with_report(VertexId(0), &graph, &routing, placements.get(VertexId(0)).unwrap(), &recording(), false)
        .unwrap();
    let reader = DataSpecReader::new(&spec.bytes, &spec.layout).unwrap();
    assert_eq!(reader.words(CellRegion::Transmissions.id()).unwrap(), vec![0, 0]);
    assert_eq!(reader.words(CellRegion::NeighbourInitialStates.id()).unwrap(), vec![0, 8]);
    assert!(spec.text_report.is_none());
}

#[test]
fn run_length_reaches_system_region() {
    let (mut graph, routing, placements) = grid(&[]);
    graph
        .vertex_mut(VertexId(2))
        .unwrap()
        .simulator_mut()
        .set_run_length(RunLength::Steps(250))
        .unwrap();

    let spec = generate_with_report(VertexId(2), &graph, &routing, placements.get(VertexId(2)).unwrap(), &recording(), false)
        .unwrap();
    let reader = DataSpecReader::new(&spec.bytes, &spec.layout).unwrap();
    assert_eq!(reader.words(CellRegion::System.id()).unwrap()[2..], [0, 250]);
}

#[test]
fn sdram_matches_generated_length() {
    let (graph, routing, placements) = grid(&[1, 7]);
    for config in [recording(), RecordingConfig::default()] {
        for id in [VertexId(0), VertexId(8)] {
            let bytes = generate(id, &graph, &routing, placements.get(id).unwrap(), &config).unwrap();
            let cell = ConwayBasicCell::new("probe", false, 1000);
            assert_eq!(required_resources(&cell, &config).unwrap().sdram_bytes as usize, bytes.len());
        }
    }
}

#[test]
fn text_mirror_has_one_line_per_value() {
    let (graph, routing, placements) = grid(&[3]);
    let spec = generate_with_report(VertexId(0), &graph, &routing, placements.get(VertexId(0)).unwrap(), &recording(), true)
        .unwrap();
    let report = spec.text_report.unwrap();

    // system 4 + transmission 2 + state 1 + neighbours 2 + header 8
    assert_eq!(report.lines().count(), 17);
    assert!(report.lines().next().unwrap().starts_with("region 0 (system)"));
}

#[test]
fn ninth_edge_fails_before_any_write() {
    let (mut graph, routing, placements) = grid(&[]);
    let extra = graph.add_vertex(ConwayBasicCell::new("extra", true, 1000));
    graph.add_edge(extra, VertexId(0), PARTITION_ID).unwrap();

    let err = generate(VertexId(0), &graph, &routing, placements.get(VertexId(0)).unwrap(), &recording())
        .unwrap_err();
    assert_eq!(err.vertex, "cell_0");
    assert_eq!(err.stage, GenerationStage::ValidateTopology);
    assert_eq!(
        err.kind,
        GenerationErrorKind::Topology(TopologyError::TopologyMismatch {
            expected: 8,
            observed: 9
        })
    );
}

#[test]
fn batch_persists_valid_cells_and_skips_the_rest() {
    let dir = tempfile::tempdir().unwrap();
    let (mut graph, routing, placements) = grid(&[4]);
    // cell 8 gains a ninth incoming edge; `extra` itself has no placement
    let extra = graph.add_vertex(ConwayBasicCell::new("extra", true, 1000));
    graph.add_edge(extra, VertexId(8), PARTITION_ID).unwrap();

    let options = BatchOptions {
        max_workers: 2,
        run_root: dir.path().to_str().unwrap().to_string(),
        write_text_specs: true,
    };
    let report = generate_all(&graph, &routing, &placements, &recording(), &options).unwrap();

    assert_eq!(report.outcomes.len(), 10);
    assert_eq!(report.succeeded().count(), 8);
    assert!(!report.is_complete());

    for outcome in report.succeeded() {
        let paths = outcome.result.as_ref().unwrap();
        assert!(paths.binary.exists());
        assert!(paths.text.as_ref().unwrap().exists());
    }

    let failures: Vec<_> = report.failed().collect();
    assert!(matches!(
        &failures[0].result,
        Err(VertexFailure::Generation(e)) if e.vertex == "cell_8" && e.is_topology()
    ));
    assert!(matches!(failures[1].result, Err(VertexFailure::Unplaced(v)) if v == extra));
    assert!(!dir.path().join("192.168.240.1_dataSpec_0_0_9.dat").exists());
    assert!(dir.path().join("192.168.240.1_dataSpec_0_0_1.dat").exists());
}

/// Cell 0 of `graph` is the only failing vertex; checks the stage and that
/// the batch leaves no artifact for it
fn assert_rejected_without_artifact(
    graph: &MachineGraph<ConwayBasicCell>,
    routing: &RoutingInfo,
    placements: &Placements,
    expected: TopologyError,
) {
    let placement = placements.get(VertexId(0)).unwrap();
    let err = generate(VertexId(0), graph, routing, placement, &recording()).unwrap_err();
    assert_eq!(err.stage, GenerationStage::ValidateTopology);
    assert_eq!(err.kind, GenerationErrorKind::Topology(expected));

    let dir = tempfile::tempdir().unwrap();
    let options = BatchOptions {
        max_workers: 1,
        run_root: dir.path().to_str().unwrap().to_string(),
        write_text_specs: true,
    };
    let report = generate_all(graph, routing, placements, &recording(), &options).unwrap();
    let rejected: Vec<_> = report
        .failed()
        .filter(|o| matches!(o.result, Err(VertexFailure::Generation(_))))
        .map(|o| o.vertex)
        .collect();
    assert_eq!(rejected, vec![VertexId(0)]);
    assert_eq!(report.succeeded().count(), 8);

    let paths = artifact_path(&placement.hostname, placement.x, placement.y, placement.p, &options.run_root, true);
    assert!(!paths.binary.exists());
    assert!(!paths.text.unwrap().exists());
}

#[test]
fn self_connection_rejected_at_generation() {
    // cell 0 hears itself instead of cell 8, keeping eight incoming edges
    let (mut graph, routing, placements) = grid_wired(&[], |pre, post| pre != post && (pre, post) != (8, 0));
    graph.add_edge(VertexId(0), VertexId(0), PARTITION_ID).unwrap();

    assert_rejected_without_artifact(
        &graph,
        &routing,
        &placements,
        TopologyError::SelfConnection { vertex: VertexId(0) },
    );
}

#[test]
fn second_partition_rejected_at_generation() {
    let (mut graph, routing, placements) = grid(&[]);
    // an unplaced monitor listening on a second partition of cell 0
    let monitor = graph.add_vertex(ConwayBasicCell::new("monitor", false, 1000));
    graph.add_edge(VertexId(0), monitor, "CONTROL").unwrap();

    assert_rejected_without_artifact(
        &graph,
        &routing,
        &placements,
        TopologyError::MultiplePartition { observed: 2 },
    );
}

#[test]
fn oversized_recording_buffer_is_a_generation_error() {
    let (graph, routing, placements) = grid(&[]);
    let recording = RecordingConfig {
        max_channel_buffer_bytes: u32::MAX - 3,
        ..RecordingConfig::default()
    };
    let cell = graph.vertex(VertexId(0)).unwrap();

    assert!(matches!(
        required_resources(cell, &recording),
        Err(DataSpecError::SizeOverflow(_))
    ));
    let err = generate(VertexId(0), &graph, &routing, placements.get(VertexId(0)).unwrap(), &recording)
        .unwrap_err();
    assert_eq!(err.stage, GenerationStage::ReserveRegions);
    assert!(matches!(err.kind, GenerationErrorKind::Spec(DataSpecError::SizeOverflow(_))));
}
