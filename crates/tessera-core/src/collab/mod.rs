// Copyright 2025 eraflo
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

//! External collaborator contracts.
//!
//! The orchestration layer consumes these traits and nothing else: transport,
//! native filesystem storage, the durable key-value database, bundle
//! containers, and the bytes-to-object decoder. Concrete implementations are
//! provided by the embedding application, never by this workspace.

mod bundle;
mod database;
mod decoder;
mod store;
mod transport;

pub use bundle::*;
pub use database::*;
pub use decoder::*;
pub use store::*;
pub use transport::*;
