// ─── Launch Panel Core ───
// Backend for the launcher home panel.
//
// Architecture:
//   core/
//     config/    Game profile + settings → LaunchConfiguration
//     settings/  Key-addressed persisted records
//     launch/    Engine events, lifecycle state machine, orchestrator
//     progress   Percentages, ETA and speed formatting
//     status/    Game server reachability
//     mods/      Installed add-on inventory
//     emit       View updates and host-window signals
//     paths      Install root layout

pub mod config;
pub mod emit;
pub mod error;
pub mod launch;
pub mod mods;
pub mod paths;
pub mod progress;
pub mod settings;
pub mod status;
