use mesh_multiscale::prelude::*;

fn line_setup(params: &MultigridParams) -> Result<MultiscaleMesh, MeshError> {
    let positions = (0..7).map(|i| [i as f64, 0.0, 0.0]).collect();
    let mut boundary = vec![false; 7];
    boundary[0] = true;
    boundary[6] = true;
    let cloud = PointCloud::try_new(positions, boundary)?;
    let graph = NeighborGraph::from_edges(7, (1..7).map(|i| (i - 1, i)))?;
    let ab = Abundances::uniform(7, 1, 1.0)?;
    HierarchyBuilder::new(cloud, graph, GabrielAdjacency::default()).setup(&ab, params)
}

#[test]
fn params_round_trip_through_json() {
    let params = MultigridParams {
        max_level: 4,
        tolerance: 0.25,
        cycle_selector: 3,
        max_iterations: 2,
        finest_level: 1,
        reference_species: 0,
    };
    let json = serde_json::to_string(&params).unwrap();
    let back: MultigridParams = serde_json::from_str(&json).unwrap();
    assert_eq!(back, params);

    let opts: CoarseningOptions =
        serde_json::from_str(r#"{"forbid_adjacent_seeds":false}"#).unwrap();
    assert!(!opts.forbid_adjacent_seeds);

    let interp: InterpolationOptions = serde_json::from_str("{}").unwrap();
    assert_eq!(interp, InterpolationOptions::default());
}

#[test]
fn partial_json_falls_back_to_defaults() {
    let params: MultigridParams = serde_json::from_str(r#"{"max_level":2}"#).unwrap();
    assert_eq!(params.max_level, 2);
    assert_eq!(params.cycle_selector, MultigridParams::default().cycle_selector);
}

#[test]
fn unknown_cycle_selector_is_a_configuration_error() {
    let params: MultigridParams =
        serde_json::from_str(r#"{"max_level":2,"tolerance":0.5,"cycle_selector":4}"#).unwrap();
    let err = line_setup(&params).unwrap_err();
    assert_eq!(err, MeshError::UnknownCyclePolicy(4));
    assert!(err.is_configuration_error());
}

#[test]
fn cycle_policies_over_a_built_hierarchy() {
    let base = MultigridParams {
        max_level: 2,
        tolerance: 0.5,
        ..Default::default()
    };
    let levels = |selector: i64, iterations: usize| {
        let mesh = line_setup(&MultigridParams {
            cycle_selector: selector,
            max_iterations: iterations,
            ..base.clone()
        })
        .unwrap();
        mesh.cycle().map(|v| v.level).collect::<Vec<_>>()
    };
    assert_eq!(levels(1, 1), vec![2, 1, 0]);
    assert_eq!(levels(2, 1), vec![0, 1, 2, 1, 0]);
    assert_eq!(levels(3, 1), vec![0, 1, 2, 1, 2, 1, 0]);
    assert_eq!(levels(2, 2), vec![0, 1, 2, 1, 0, 1, 2, 1, 0]);

    let mesh = line_setup(&base).unwrap();
    assert_eq!(mesh.cycle_kind(), CycleKind::VCycle);
    assert_eq!(mesh.level_sizes().unwrap().len(), 3);
}

#[test]
fn invalid_fields_fail_before_building() {
    for params in [
        MultigridParams {
            tolerance: -0.1,
            ..Default::default()
        },
        MultigridParams {
            max_level: 1,
            finest_level: 2,
            ..Default::default()
        },
        MultigridParams {
            max_iterations: 0,
            ..Default::default()
        },
    ] {
        let err = line_setup(&params).unwrap_err();
        assert!(err.is_configuration_error(), "{err}");
    }
}

#[test]
fn level_count_is_checked_against_the_cloud() {
    for max_level in [0, 7, 500] {
        let params = MultigridParams {
            max_level,
            tolerance: 0.5,
            ..Default::default()
        };
        let err = line_setup(&params).unwrap_err();
        assert!(
            matches!(err, MeshError::InvalidConfiguration(_)),
            "max_level {max_level}: {err}"
        );
    }

    let deepest = MultigridParams {
        max_level: 6,
        tolerance: 0.5,
        ..Default::default()
    };
    let mesh = line_setup(&deepest).unwrap();
    assert_eq!(mesh.level_sizes().unwrap().len(), 7);
}
