//! Plain-text rendering of the dashboard.

use std::fmt::Write;

use lifesys_shared::{
    Attribute, AttributeStatsResponse, LeaderboardEntry, PlayerStatsResponse,
    QuestCompleteResponse, QuestResponse,
};

use crate::application::dashboard::DashboardData;

const BAR_WIDTH: usize = 20;

/// `[#####---------------]` for a 0..=100 percentage.
pub fn xp_bar(progress_percentage: f64, width: usize) -> String {
    let ratio = (progress_percentage / 100.0).clamp(0.0, 1.0);
    let filled = ((ratio * width as f64).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

fn attribute_line(out: &mut String, attribute: Attribute, track: &AttributeStatsResponse) {
    let _ = writeln!(
        out,
        "  {:<13} Lv {:<3} {} {} XP",
        attribute.as_str(),
        track.level,
        xp_bar(track.progress_percentage, 10),
        track.xp
    );
}

pub fn render_stats(out: &mut String, stats: &PlayerStatsResponse) {
    let _ = writeln!(
        out,
        "Level {}  {} {:.0}%  ({} XP, {} to next)",
        stats.level,
        xp_bar(stats.progress_percentage, BAR_WIDTH),
        stats.progress_percentage,
        stats.total_xp,
        stats.xp_to_next_level
    );
    let _ = writeln!(
        out,
        "Quests completed: {}  Streak: {} day(s)",
        stats.quests_completed, stats.streak_days
    );
    for attribute in Attribute::ALL {
        attribute_line(out, *attribute, stats.attributes.get(*attribute));
    }
}

pub fn render_quests(out: &mut String, quests: &[QuestResponse]) {
    let _ = writeln!(out, "Active quests ({}):", quests.len());
    if quests.is_empty() {
        let _ = writeln!(out, "  none - create one to start earning XP");
    }
    for quest in quests {
        let due = quest
            .due_date
            .map(|d| format!("  due {}", d.format("%Y-%m-%d")))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "  {}  {} [{} / {}] +{} XP{}",
            quest.id, quest.title, quest.difficulty, quest.attribute, quest.xp_reward, due
        );
    }
}

pub fn render_leaderboard(out: &mut String, entries: &[LeaderboardEntry]) {
    let _ = writeln!(out, "Leaderboard:");
    for entry in entries {
        let _ = writeln!(
            out,
            "  #{:<3} {:<20} Lv {:<3} {} XP  ({} quests)",
            entry.position, entry.name, entry.level, entry.total_xp, entry.quests_completed
        );
    }
}

pub fn render(data: &DashboardData) -> String {
    let mut out = String::new();
    render_stats(&mut out, &data.stats);
    out.push('\n');
    render_quests(&mut out, &data.active_quests);
    out.push('\n');
    render_leaderboard(&mut out, &data.leaderboard);
    out
}

pub fn render_completion(completed: &QuestCompleteResponse) -> String {
    let mut out = format!("{}\n", completed.message);
    if completed.level_up {
        let _ = writeln!(
            out,
            "LEVEL UP! {} -> {}",
            completed.old_level, completed.new_level
        );
    }
    if completed.attribute_level_up {
        let _ = writeln!(
            out,
            "{} {} -> {}",
            completed.attribute, completed.attribute_old_level, completed.attribute_new_level
        );
    }
    out
}
