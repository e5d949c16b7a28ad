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

//! Stack domain: the synthesis pipeline and its pre-flight validation

pub mod synthesizer;
pub mod validator;

pub use synthesizer::{
    apply_access_policy, build_cluster, install_add_ons, propagate_tags, resolve_network,
    BuildContext, BuildStage, BuildState, StackSynthesizer,
};
pub use validator::StackValidator;
