//! Plain-text estimate report.

use std::collections::BTreeMap;

use crate::aggregate::{BillOfMaterials, ProjectEstimate, RoomEstimate};
use crate::config::MaterialClass;
use crate::model::{RequirementPlan, StockKey};
use crate::planner::PerimeterPlan;

use super::writer::{format_length, format_percent, ReportWriter};

/// Generate the installer/purchasing report for an estimate.
pub fn generate_report(estimate: &ProjectEstimate) -> String {
    let mut writer = ReportWriter::new();

    writer.field("Project", &estimate.project);
    writer.field("Creator", "stockcut-rs");

    for room in &estimate.rooms {
        write_room(&mut writer, room);
    }

    if !estimate.extras.is_empty() || !estimate.baseboard_extras.is_empty() {
        writer.section("Extra requirements");
        for plan in &estimate.extras {
            write_requirement(&mut writer, &plan.requirement.origin, plan);
        }
        for plan in &estimate.baseboard_extras {
            write_perimeter(&mut writer, &plan.room_name, plan);
        }
    }

    write_bill(&mut writer, &estimate.bill);

    if !estimate.leftover_offcuts.is_empty() {
        writer.section("Leftover offcuts");
        for offcut in &estimate.leftover_offcuts {
            writer.write_line(&format!(
                "#{} {} from {}",
                offcut.id,
                format_length(offcut.length),
                offcut.origin
            ));
        }
    }

    writer.take_output()
}

fn write_room(writer: &mut ReportWriter, room: &RoomEstimate) {
    if let Some(error) = &room.error {
        writer.section(&format!("Room {} (excluded)", room.name));
        writer.write_line(error);
        return;
    }

    writer.section(&format!("Room {}", room.name));
    if let Some(slats) = &room.slats {
        write_requirement(writer, "Slats", slats);
    }
    if let Some(perimeter) = &room.perimeter {
        write_perimeter(writer, "Baseboard", perimeter);
    }
}

fn format_bars(bars: &BTreeMap<StockKey, u32>) -> String {
    bars.iter()
        .rev()
        .map(|(key, quantity)| format!("{} x {} m", quantity, key))
        .collect::<Vec<_>>()
        .join(" + ")
}

fn write_requirement(writer: &mut ReportWriter, label: &str, plan: &RequirementPlan) {
    writer.field(
        label,
        format!(
            "{} x {} ({})",
            plan.requirement.count,
            format_length(plan.requirement.length),
            plan.material
        ),
    );
    writer.push_indent();
    match &plan.solution {
        Some(_) => {
            writer.write_line(&format!(
                "Buy {}, waste {}",
                format_bars(&plan.bars),
                format_length(plan.waste)
            ));
            if plan.splices > 0 {
                writer.field("Splices", plan.splices);
            }
        }
        None => writer.write_line("UNMET: no stock combination covers this length"),
    }
    writer.pop_indent();
}

fn write_perimeter(writer: &mut ReportWriter, label: &str, plan: &PerimeterPlan) {
    writer.field(
        label,
        format!(
            "{}, {} new bars, {} reused pieces, {} splices",
            format_length(plan.required_length),
            plan.bars_used,
            plan.reused_pieces,
            plan.splices
        ),
    );
    writer.push_indent();
    writer.write_line(&format!(
        "Waste {}, stock efficiency {}, material efficiency {}",
        format_length(plan.waste),
        format_percent(plan.stock_efficiency),
        format_percent(plan.material_efficiency)
    ));
    for instruction in &plan.instructions {
        writer.write_line(&instruction.to_string());
    }
    for segment in &plan.unmet {
        writer.write_line(&format!("UNMET: segment of {}", format_length(*segment)));
    }
    writer.pop_indent();
}

fn write_bill(writer: &mut ReportWriter, bill: &BillOfMaterials) {
    writer.section("Bill of materials");
    for class in MaterialClass::ALL {
        let Some(lengths) = bill.stock().get(&class) else {
            continue;
        };
        for (key, quantity) in lengths.iter().rev() {
            writer.write_line(&format!("{} {} m: {}", class, key, quantity));
        }
    }
    writer.field("Splices", bill.splice_count());
    for class in MaterialClass::ALL {
        if bill.stock().contains_key(&class) {
            writer.field(&format!("Waste {}", class), format_length(bill.waste(class)));
        }
    }
    writer.field("Area", format!("{:.2} m²", bill.area()));
    writer.field("Perimeter", format_length(bill.perimeter()));
    writer.field("Slat linear meters", format_length(bill.linear_meters()));
    writer.field("Slat rows", bill.row_count());

    if !bill.accessories().is_empty() {
        writer.section("Accessories");
        for line in bill.accessories() {
            writer.field(&line.name, line.quantity);
        }
    }

    if !bill.unmet().is_empty() {
        writer.section("Unmet requirements");
        for unmet in bill.unmet() {
            writer.write_line(&format!(
                "{}: {} x {} ({})",
                unmet.origin,
                unmet.count,
                format_length(unmet.length),
                unmet.material
            ));
        }
    }

    if !bill.invalid().is_empty() {
        writer.section("Invalid input");
        for entry in bill.invalid() {
            writer.field(&entry.subject, &entry.reason);
        }
    }
}
