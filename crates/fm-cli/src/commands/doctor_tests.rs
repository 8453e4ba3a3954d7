// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::handle;

#[test]
fn runs_to_completion_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = fm_config::FmConfig {
        log_root: dir.path().to_path_buf(),
        ..fm_config::FmConfig::default()
    };
    let code = handle(&config).unwrap();
    assert_eq!(code, 0);
}
