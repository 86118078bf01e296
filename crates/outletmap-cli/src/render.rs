//! Terminal rendering for session state.

use std::io::{self, Write};

use outletmap_core::{html_to_text, ChatMessage, MapView, Outlet, Sender, Session, Transcript};
use serde::Serialize;

use crate::controller::ReplyOutcome;

/// One row of `outletmap outlets --json`.
#[derive(Debug, Serialize)]
pub(crate) struct OutletRow<'a> {
    #[serde(flatten)]
    pub outlet: &'a Outlet,
    pub highlighted: bool,
}

fn rows(session: &Session, highlighted_only: bool) -> impl Iterator<Item = OutletRow<'_>> {
    session
        .outlets_with_highlight()
        .filter(move |(_, highlighted)| !highlighted_only || *highlighted)
        .map(|(outlet, highlighted)| OutletRow {
            outlet,
            highlighted,
        })
}

pub(crate) fn write_outlets(
    out: &mut impl Write,
    session: &Session,
    highlighted_only: bool,
) -> io::Result<()> {
    let mut count = 0usize;
    for row in rows(session, highlighted_only) {
        count += 1;
        let mark = if row.highlighted { '*' } else { ' ' };
        writeln!(out, "{mark} {}", row.outlet.name)?;
        if !row.outlet.address.is_empty() {
            writeln!(out, "    {}", row.outlet.address)?;
        }
        if let Some(hours) = row.outlet.operating_hours.as_deref() {
            writeln!(out, "    Hours: {hours}")?;
        }
        if let Some(link) = row.outlet.navigable_waze_link() {
            writeln!(out, "    Waze: {link}")?;
        }
        if row.outlet.coordinate().is_none() {
            writeln!(out, "    (no coordinates)")?;
        }
    }
    let highlighted = session.outlets_with_highlight().filter(|(_, h)| *h).count();
    writeln!(
        out,
        "{count} outlet(s) shown, {highlighted} overlapping another outlet's coverage"
    )
}

pub(crate) fn write_outlets_json(
    out: &mut impl Write,
    session: &Session,
    highlighted_only: bool,
) -> anyhow::Result<()> {
    let rows: Vec<OutletRow<'_>> = rows(session, highlighted_only).collect();
    serde_json::to_writer_pretty(&mut *out, &rows)?;
    writeln!(out)?;
    Ok(())
}

pub(crate) fn write_map_view(
    out: &mut impl Write,
    view: &MapView,
    pretty: bool,
) -> anyhow::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, view)?;
    } else {
        serde_json::to_writer(&mut *out, view)?;
    }
    writeln!(out)?;
    Ok(())
}

/// Bot messages are HTML and are flattened to plain text for the terminal.
pub(crate) fn write_message(out: &mut impl Write, message: &ChatMessage) -> io::Result<()> {
    match message.sender {
        Sender::User => writeln!(out, "you> {}", message.text),
        Sender::Bot => {
            let text = html_to_text(&message.text);
            let mut lines = text.lines();
            writeln!(out, "bot> {}", lines.next().unwrap_or_default())?;
            for line in lines {
                if line.is_empty() {
                    writeln!(out)?;
                } else {
                    writeln!(out, "     {line}")?;
                }
            }
            Ok(())
        }
    }
}

pub(crate) fn write_transcript(out: &mut impl Write, transcript: &Transcript) -> io::Result<()> {
    if transcript.is_empty() {
        return writeln!(out, "(no messages yet)");
    }
    for message in transcript {
        write_message(out, message)?;
    }
    Ok(())
}

/// Writes the newest bot reply, or the session error after a failed request.
pub(crate) fn write_reply(
    out: &mut impl Write,
    err: &mut impl Write,
    session: &Session,
    outcome: ReplyOutcome,
) -> io::Result<()> {
    match outcome {
        ReplyOutcome::Replied => match session.transcript().last() {
            Some(message) if message.sender == Sender::Bot => write_message(out, message),
            _ => Ok(()),
        },
        ReplyOutcome::Failed => writeln!(err, "error: {}", session.error().unwrap_or_default()),
    }
}
