pub mod face_mesh_client;
pub mod landmark_provider;
