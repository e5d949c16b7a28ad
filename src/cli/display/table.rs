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

//! Table rendering for CLI output

use super::ColorTheme;
use crate::infrastructure::synthesis::template::SynthesizedStack;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};

/// Table renderer for formatted output
pub struct TableRenderer {
    theme: ColorTheme,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRenderer {
    /// Create a new table renderer with default theme
    pub fn new() -> Self {
        Self {
            theme: ColorTheme::default(),
        }
    }

    /// Render a synthesized stack as a plan table, resources in apply order
    pub fn render_plan(&self, stack: &SynthesizedStack) -> String {
        if stack.resources.is_empty() {
            return "No resources synthesized".to_string();
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("#").set_alignment(CellAlignment::Right),
                Cell::new("RESOURCE").set_alignment(CellAlignment::Left),
                Cell::new("KIND").set_alignment(CellAlignment::Left),
                Cell::new("DEPENDS ON").set_alignment(CellAlignment::Left),
            ]);

        for (index, resource) in stack.resources.iter().enumerate() {
            let depends = if resource.depends_on.is_empty() {
                "-".to_string()
            } else {
                resource.depends_on.join("\n")
            };

            table.add_row(vec![
                Cell::new(index + 1),
                Cell::new(&resource.id),
                Cell::new(resource.kind.as_str()).fg(self.theme.kind_color(resource.kind)),
                Cell::new(depends),
            ]);
        }

        let mut output = String::new();
        output.push_str(&format!(
            "Stack '{}' ({} @ {}): {} resource(s)\n",
            stack.stack_id,
            stack.account,
            stack.region,
            stack.resources.len()
        ));
        output.push_str(&table.to_string());
        output
    }
}
