// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded schema migrations, applied on every open.

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Runs pending migrations. Refinery records applied versions in
/// `refinery_schema_history`.
pub(crate) fn run_migrations(
    conn: &mut rusqlite::Connection,
) -> Result<refinery::Report, refinery::Error> {
    embedded::migrations::runner().run(conn)
}
