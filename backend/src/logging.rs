/* wattway
 * Copyright (C) 2024 Frederic Henrichs <frederic@tinkerforge.com>
 *
 * This library is free software; you can redistribute it and/or
 * modify it under the terms of the GNU Lesser General Public
 * License as published by the Free Software Foundation; either
 * version 2 of the License, or (at your option) any later version.
 *
 * This library is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU
 * Lesser General Public License for more details.
 *
 * You should have received a copy of the GNU Lesser General Public
 * License along with this library; if not, write to the
 * Free Software Foundation, Inc., 59 Temple Place - Suite 330,
 * Boston, MA 02111-1307, USA.
 */

use std::fs::File;

use anyhow::Context;
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, TermLogger, TerminalMode,
};

#[cfg(not(debug_assertions))]
use simplelog::WriteLogger;

/// Create `log_dir` if needed and open a fresh `<prefix>-<date>-<hour>.log` in it.
pub fn open_log_file(log_dir: &str, prefix: &str) -> anyhow::Result<File> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {log_dir}"))?;
    let path = format!(
        "{log_dir}/{prefix}-{}.log",
        chrono::Local::now().format("%Y-%m-%d-%H")
    );

    File::create(&path).with_context(|| format!("Failed to create log file {path}"))
}

/// Set up the global logger for one of the binaries.
///
/// Debug builds log everything to the terminal. Release builds log Info and up
/// to the terminal and to a file opened with [`open_log_file`].
#[cfg_attr(debug_assertions, allow(unused_variables))]
pub fn init_logging(log_dir: &str, prefix: &str) -> anyhow::Result<()> {
    let mut builder = ConfigBuilder::new();
    builder.set_time_format_rfc3339();
    // falls back to UTC when the local offset cannot be determined
    let _ = builder.set_time_offset_to_local();
    let log_config = builder.build();

    #[cfg(debug_assertions)]
    CombinedLogger::init(vec![TermLogger::new(
        LevelFilter::Debug,
        log_config,
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )])?;

    #[cfg(not(debug_assertions))]
    {
        let file = open_log_file(log_dir, prefix)?;
        CombinedLogger::init(vec![
            TermLogger::new(
                LevelFilter::Info,
                log_config.clone(),
                TerminalMode::Mixed,
                ColorChoice::Auto,
            ),
            WriteLogger::new(LevelFilter::Info, log_config, file),
        ])?;
    }

    Ok(())
}
