//! Human-readable output for snapshots and records

use std::fmt::Write as _;

use college_admin_core::{College, Snapshot};

/// Tree-style list of the visible colleges
pub fn college_list(snapshot: &Snapshot) -> String {
    let mut out = String::new();

    let mut header = format!(
        "┌─ Colleges ({} of {})",
        snapshot.visible.len(),
        snapshot.total
    );
    if !snapshot.query.search.is_empty() {
        let _ = write!(header, " · search \"{}\"", snapshot.query.search);
    }
    if let Some(district) = &snapshot.query.district {
        let _ = write!(header, " · district {}", district);
    }
    let _ = writeln!(out, "{}", header);
    let _ = writeln!(out, "│");

    if let Some(placeholder) = snapshot.empty_state() {
        let _ = writeln!(out, "└─ ({})", placeholder);
        return out;
    }

    let last = snapshot.visible.len() - 1;
    for (i, college) in snapshot.visible.iter().enumerate() {
        let (prefix, cont) = if i == last {
            ("└─", "   ")
        } else {
            ("├─", "│  ")
        };
        let _ = writeln!(out, "{} {}  [{}]", prefix, college.name, college.id_str());
        let _ = writeln!(out, "{}{}", cont, summary_line(college));
        if i != last {
            let _ = writeln!(out, "│");
        }
    }
    out
}

fn summary_line(college: &College) -> String {
    let mut parts = vec![college.district.clone()];
    match college.programs.len() {
        0 => {}
        1 => parts.push("1 program".to_string()),
        n => parts.push(format!("{} programs", n)),
    }
    if !college.facilities.is_empty() {
        parts.push(college.facilities.join(", "));
    }
    parts.join(" · ")
}

/// Every field of one record
pub fn college_detail(college: &College) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "┌─ {}  [{}]", college.name, college.id_str());
    let _ = writeln!(out, "│  District: {}", college.district);
    let _ = writeln!(out, "│  Address:  {}", college.address);

    let contact = &college.contact;
    for (label, value) in [
        ("Phone", &contact.phone),
        ("Email", &contact.email),
        ("Website", &contact.website),
        ("Map", &college.location.map_link),
        ("Embed", &college.location.embed_url),
    ] {
        if !value.is_empty() {
            let _ = writeln!(out, "│  {:<9} {}", format!("{}:", label), value);
        }
    }

    let _ = writeln!(out, "│");
    if college.programs.is_empty() {
        let _ = writeln!(out, "├─ Programs: (none)");
    } else {
        let _ = writeln!(out, "├─ Programs");
        for program in &college.programs {
            let mut line = format!("│  • {} (cutoff {}", program.name, program.cutoff);
            if !program.eligibility.is_empty() {
                let _ = write!(line, ", {}", program.eligibility);
            }
            let _ = write!(line, ", {})", program.medium);
            let _ = writeln!(out, "{}", line);
        }
    }

    if college.facilities.is_empty() {
        let _ = writeln!(out, "└─ Facilities: (none)");
    } else {
        let _ = writeln!(out, "└─ Facilities: {}", college.facilities.join(", "));
    }
    out
}
