// Copyright 2018 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


use log::{error, info};

use redline::engine::Engine;
use redline::window::WindowBuilder;

fn main() {
    env_logger::init();

    let result = Engine::new(WindowBuilder::default()).and_then(Engine::run);
    match result {
        Ok(stats) => info!("{} frames, {:.0} fps at exit", stats.frames, stats.fps),
        Err(e) => {
            error!("{}", e);
            std::process::exit(e.exit_code());
        }
    }
}
