pub mod model;
pub mod profile;
pub mod resolver;

pub use model::{
    AccountHandle, CloseBehavior, JavaRuntime, LaunchConfiguration, LoaderDescriptor, LoaderType,
    MemoryBounds, ScreenSize,
};
pub use profile::{GameProfile, StatusEndpoint};
pub use resolver::ConfigurationResolver;
