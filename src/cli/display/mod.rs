// Copyright 2025 the eks-forge Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Formatted CLI output

pub mod table;

pub use table::TableRenderer;

use crate::infrastructure::synthesis::graph::ResourceKind;
use comfy_table::Color as TableColor;

/// Color theme for table output
#[derive(Debug, Clone)]
pub struct ColorTheme {
    pub success: TableColor,
    pub warning: TableColor,
    pub error: TableColor,
    pub info: TableColor,
    pub muted: TableColor,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            success: TableColor::Green,
            warning: TableColor::Yellow,
            error: TableColor::Red,
            info: TableColor::Cyan,
            muted: TableColor::DarkGrey,
        }
    }
}

impl ColorTheme {
    /// Color resources by kind so the plan reads at a glance
    pub fn kind_color(&self, kind: ResourceKind) -> TableColor {
        match kind {
            ResourceKind::Cluster | ResourceKind::NodeGroup => self.info,
            ResourceKind::ClusterRole
            | ResourceKind::ClusterRoleBinding
            | ResourceKind::IdentityMap => self.warning,
            ResourceKind::HelmRelease => self.success,
            ResourceKind::Manifest => self.muted,
        }
    }
}

/// Status icons for command output
pub struct StatusIcon;

impl StatusIcon {
    pub const SUCCESS: &'static str = "✓";
    pub const ERROR: &'static str = "✗";
}
