//! Integration tests for project estimation.
//!
//! These tests drive the public API end to end: solvers against the slat
//! catalog, perimeter planning through a shared offcut pool, and the bill of
//! materials built from several rooms.

use pretty_assertions::assert_eq;
use std::io::Write;
use stockcut_rs::{
    estimate_file, estimate_project, generate_report, parse_project_str, CutInstruction,
    CuttingSolver, EngineConfig, ErrorCode, EstimateError, MaterialClass, PieceUsage, Project,
    Room, SolutionKind, SpliceSolver, StockCatalog,
};

fn slats() -> StockCatalog {
    StockCatalog::preset(MaterialClass::Slat)
}

fn instruction_text(instructions: &[CutInstruction]) -> Vec<String> {
    instructions.iter().map(|i| i.to_string()).collect()
}

// ==================== Solver scenarios ====================

#[test]
fn test_whole_piece_match() {
    let solution = SpliceSolver::default().solve(6.0, &slats()).unwrap();
    assert_eq!(solution.kind, SolutionKind::WholePiece);
    assert_eq!(solution.pieces, vec![PieceUsage::whole(6.0, 1)]);
    assert_eq!(solution.total_waste, 0.0);
}

#[test]
fn test_ten_meters_tie_break() {
    // Without splicing: 6+4 and 5+5 are both zero waste with two pieces;
    // 6+4 is generated first and wins.
    let solution = CuttingSolver::default().solve(10.0, &slats()).unwrap();
    assert_eq!(solution.kind, SolutionKind::Combination);
    assert_eq!(
        solution.pieces,
        vec![PieceUsage::whole(6.0, 1), PieceUsage::whole(4.0, 1)]
    );

    // Through the splice solver the same pieces come out as one splice.
    let spliced = SpliceSolver::default().solve(10.0, &slats()).unwrap();
    assert_eq!(spliced.kind, SolutionKind::Splice);
    assert_eq!(spliced.pieces, solution.pieces);
    assert_eq!(spliced.number_of_splices, 1);
}

#[test]
fn test_thirteen_meters_spliced() {
    let solution = SpliceSolver::default().solve(13.0, &slats()).unwrap();
    assert!(solution.spliced);
    assert_eq!(solution.number_of_splices, 2);
    assert_eq!(
        solution.pieces,
        vec![PieceUsage::whole(6.0, 2), PieceUsage::cut(4.0, 1, 1.0)]
    );
    assert!((solution.total_waste - 3.0).abs() < 1e-9);
    assert!((solution.covered_length() - 13.0).abs() < 0.01);
}

#[test]
fn test_reset_catalog_is_deterministic() {
    let mut catalog = slats();
    catalog.remove(5.0).unwrap();
    catalog.reset();

    let solver = SpliceSolver::default();
    let first = solver.solve(7.3, &catalog);
    let second = solver.solve(7.3, &catalog);
    assert!(first.is_some());
    assert_eq!(first, second);
}

#[test]
fn test_catalog_exhaustion_rejected() {
    let mut catalog = StockCatalog::preset(MaterialClass::Baseboard);
    let err = catalog.remove(6.0).unwrap_err();
    assert_eq!(err.code(), ErrorCode::CatalogExhaustion);
    assert_eq!(catalog.len(), 1);
}

// ==================== Perimeter scenarios ====================

fn two_rooms() -> Project {
    Project::new("House")
        .with_room(Room::new("Kitchen", 3.5, 4.2))
        .with_room(Room::new("Bedroom", 3.5, 2.0))
}

#[test]
fn test_second_room_reuses_first_room_offcuts() {
    let estimate = estimate_project(&two_rooms(), &EngineConfig::default()).unwrap();

    let kitchen = estimate.rooms[0].perimeter.as_ref().unwrap();
    assert_eq!(kitchen.bars_used, 4);
    assert_eq!(kitchen.reused_pieces, 0);

    let bedroom = estimate.rooms[1].perimeter.as_ref().unwrap();
    assert_eq!(bedroom.bars_used, 2);
    assert_eq!(bedroom.reused_pieces, 2);
    assert!(bedroom.reused.iter().all(|r| r.origin == "Kitchen"));
}

#[test]
fn test_golden_cut_instructions() {
    let estimate = estimate_project(&two_rooms(), &EngineConfig::default()).unwrap();

    let mut lines = Vec::new();
    for room in &estimate.rooms {
        lines.push(format!("[{}]", room.name));
        if let Some(plan) = &room.perimeter {
            lines.extend(instruction_text(&plan.instructions));
        }
    }

    insta::assert_snapshot!(lines.join("\n"), @r"
    [Kitchen]
    Bars 3-4 (wall 4.20 m): cut 1 piece of 4.20 m, leftover 1.80 m
    Bars 1-2 (wall 3.50 m): cut 1 piece of 3.50 m, leftover 2.50 m
    [Bedroom]
    Bars 1-2 (wall 3.50 m): cut 1 piece of 3.50 m, leftover 2.50 m
    Reuse 2.50 m offcut from Kitchen: cut 2.00 m (wall 2.00 m)
    Reuse 2.50 m offcut from Kitchen: cut 2.00 m (wall 2.00 m)
    ");
}

#[test]
fn test_room_order_changes_reuse() {
    let reversed = Project::new("House")
        .with_room(Room::new("Bedroom", 3.5, 2.0))
        .with_room(Room::new("Kitchen", 3.5, 4.2));
    let estimate = estimate_project(&reversed, &EngineConfig::default()).unwrap();

    let bedroom = estimate.rooms[0].perimeter.as_ref().unwrap();
    assert_eq!(bedroom.reused_pieces, 0);
    // Bedroom's own 2.5 m offcuts cover both 2 m walls
    assert_eq!(bedroom.bars_used, 2);
}

// ==================== Project estimate ====================

#[test]
fn test_invalid_room_excluded_from_totals() {
    let project = two_rooms().with_room(Room::new("Attic", 0.0, 3.0));
    let estimate = estimate_project(&project, &EngineConfig::default()).unwrap();

    let attic = estimate.room("Attic").unwrap();
    assert!(!attic.is_valid());
    assert!(attic.error.as_ref().unwrap().contains("invalid dimensions"));

    let valid = estimate_project(&two_rooms(), &EngineConfig::default()).unwrap();
    assert_eq!(estimate.bill.stock(), valid.bill.stock());
    assert_eq!(estimate.bill.perimeter(), valid.bill.perimeter());
    assert_eq!(estimate.bill.invalid().len(), 1);
    assert_eq!(estimate.bill.invalid()[0].subject, "room 'Attic'");
}

#[test]
fn test_bill_of_materials_sums_by_length() {
    let project = Project::new("Flat")
        .with_room(Room::new("Living", 3.0, 3.2).with_row_width(0.2))
        .with_room(Room::new("Study", 2.0, 3.5).with_row_width(0.25));
    let estimate = estimate_project(&project, &EngineConfig::default()).unwrap();
    let bill = &estimate.bill;

    // 15 rows of 3.2 m and 8 rows of 3.5 m, each cut from a 4 m slat
    assert_eq!(bill.quantity(MaterialClass::Slat, 4.0), 23);
    assert_eq!(bill.quantity(MaterialClass::Slat, 5.0), 0);
    assert_eq!(bill.row_count(), 23);
    assert!((bill.linear_meters() - (15.0 * 3.2 + 8.0 * 3.5)).abs() < 1e-9);
    assert_eq!(bill.accessory("end cap"), Some(23));
    assert!(bill.is_complete());
}

#[test]
fn test_estimate_is_deterministic() {
    let project = two_rooms().with_room(Room::new("Hall", 1.2, 13.0).with_row_width(0.2));
    let first = estimate_project(&project, &EngineConfig::default()).unwrap();
    let second = estimate_project(&project, &EngineConfig::default()).unwrap();
    assert_eq!(first, second);
    assert_eq!(generate_report(&first), generate_report(&second));
}

#[test]
fn test_empty_project_rejected() {
    let err = estimate_project(&Project::new("Empty"), &EngineConfig::default()).unwrap_err();
    assert!(matches!(err, EstimateError::EmptyProject));
}

// ==================== Project files ====================

const PROJECT_JSON: &str = r#"{
    "name": "House",
    "rooms": [
        { "id": "r1", "name": "Kitchen", "width": 3.5, "length": 4.2, "rowRepeatWidth": 0.2 },
        { "id": "r2", "name": "Bedroom", "width": 3.5, "length": 2.0 },
        { "id": "r3", "name": "Attic", "width": 0, "length": 3.0 }
    ],
    "extraRequirements": [
        { "name": "Door trim", "length": 2.1, "quantity": 4 }
    ]
}"#;

#[test]
fn test_estimate_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(PROJECT_JSON.as_bytes()).unwrap();

    let estimate = estimate_file(file.path()).unwrap();
    assert_eq!(estimate.project, "House");
    assert_eq!(estimate.rooms.len(), 3);
    assert!(estimate.room("r1").unwrap().is_valid());
    assert!(!estimate.room("r3").unwrap().is_valid());

    // Two 2.1 m pieces per 6 m bar
    assert_eq!(estimate.bill.quantity(MaterialClass::Trim, 6.0), 2);
    assert_eq!(estimate.bill.quantity(MaterialClass::Baseboard, 6.0), 6);
}

#[test]
fn test_project_config_applies() {
    let project = parse_project_str(
        r#"{
            "name": "Short bars",
            "rooms": [{ "name": "Closet", "width": 1.0, "length": 1.5 }],
            "config": { "bar_length": 3.0 }
        }"#,
    )
    .unwrap();
    let config = project.config.clone().unwrap();
    let estimate = estimate_project(&project, &config).unwrap();

    let plan = estimate.rooms[0].perimeter.as_ref().unwrap();
    assert_eq!(plan.bar_length, 3.0);
    assert_eq!(
        estimate.bill.quantity(MaterialClass::Baseboard, 3.0),
        u64::from(plan.bars_used)
    );
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = estimate_file(&dir.path().join("missing.json")).unwrap_err();
    assert_eq!(err.code(), ErrorCode::FileNotFound);
}
