use std::sync::Arc;
use std::time::Duration;
use anyhow::Error;
use async_trait::async_trait;
use log::debug;
use ndarray::Array2;
use tokio::sync::Semaphore;
use tonic::client::Grpc;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::{Channel, Endpoint};
use tonic::Request;
use crate::config::config::FaceMeshConfig;
use crate::modules::face_mesh_client::facemesh::{DetectLandmarksRequest, DetectLandmarksResponse, FaceLandmarks};
use crate::modules::landmark_provider::LandmarkProvider;
use crate::utils::coordinate::LandmarkSet;
use crate::utils::image::{convert_ndarray_to_landmarks, DecodedImage};
use crate::utils::utils::u8_to_f32_vec;

/// Wire messages of the `facemesh.FaceMeshService` inference API.
pub mod facemesh {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct DetectLandmarksRequest {
        #[prost(string, tag = "1")]
        pub model_name: String,
        /// Packed RGB pixels, row-major.
        #[prost(bytes = "vec", tag = "2")]
        pub image: Vec<u8>,
        #[prost(uint32, tag = "3")]
        pub width: u32,
        #[prost(uint32, tag = "4")]
        pub height: u32,
        #[prost(uint32, tag = "5")]
        pub channels: u32,
        #[prost(uint32, tag = "6")]
        pub max_faces: u32,
        #[prost(bool, tag = "7")]
        pub refine_landmarks: bool,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct FaceLandmarks {
        /// `[num_points, 2]` or `[num_points, 3]`, normalized x, y and optional depth.
        #[prost(int64, repeated, tag = "1")]
        pub shape: Vec<i64>,
        #[prost(string, tag = "2")]
        pub datatype: String,
        #[prost(bytes = "vec", tag = "3")]
        pub raw_contents: Vec<u8>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct DetectLandmarksResponse {
        #[prost(message, repeated, tag = "1")]
        pub faces: Vec<FaceLandmarks>,
    }
}

const DETECT_LANDMARKS_PATH: &str = "/facemesh.FaceMeshService/DetectLandmarks";

/// gRPC client of a remote face mesh model.
#[derive(Debug, Clone)]
pub struct FaceMeshClient {
    channel: Channel,
    permits: Arc<Semaphore>,
    pub model_name: String,
    pub timeout: Duration,
    pub max_faces: u32,
    pub refine_landmarks: bool,
}

impl FaceMeshClient {
    /// new prepares a lazily connected channel to the inference server.
    ///
    /// Must be called inside a tokio runtime.
    ///
    /// # Arguments
    /// * `config` - FaceMeshConfig
    ///
    /// # Returns
    /// * `Result<FaceMeshClient, Error>`
    pub fn new(config: FaceMeshConfig) -> Result<Self, Error> {
        let timeout = Duration::from_secs(config.timeout.max(1) as u64);
        let channel = Endpoint::from_shared(config.endpoint.clone())?
            .timeout(timeout)
            .connect_lazy();

        Ok(FaceMeshClient {
            channel,
            permits: Arc::new(Semaphore::new(config.max_concurrent_requests.max(1))),
            model_name: config.model_name,
            timeout,
            max_faces: config.max_faces,
            refine_landmarks: config.refine_landmarks,
        })
    }

    fn build_request(&self, image: &DecodedImage) -> DetectLandmarksRequest {
        DetectLandmarksRequest {
            model_name: self.model_name.to_owned(),
            image: image.pixels.clone(),
            width: image.width,
            height: image.height,
            channels: DecodedImage::CHANNELS as u32,
            max_faces: self.max_faces,
            refine_landmarks: self.refine_landmarks,
        }
    }

    async fn infer(&self, request: DetectLandmarksRequest) -> Result<DetectLandmarksResponse, Error> {
        let _permit = self.permits.acquire().await?;

        let mut grpc = Grpc::new(self.channel.clone());
        grpc.ready()
            .await
            .map_err(|e| Error::msg(format!("face_mesh_client - service was not ready: {}", e)))?;

        let codec: ProstCodec<DetectLandmarksRequest, DetectLandmarksResponse> = ProstCodec::default();
        let path = PathAndQuery::from_static(DETECT_LANDMARKS_PATH);

        let response = match tokio::time::timeout(self.timeout, grpc.unary(Request::new(request), path, codec)).await {
            Ok(response) => response?,
            Err(_) => {
                return Err(Error::msg(format!("face_mesh_client - no answer within {:?}", self.timeout)))
            }
        };
        Ok(response.into_inner())
    }
}

/// parse_face decodes one face tensor of the response.
///
/// # Arguments
/// * `face` - FaceLandmarks
///
/// # Returns
/// * `Result<LandmarkSet, Error>`
pub fn parse_face(face: &FaceLandmarks) -> Result<LandmarkSet, Error> {
    if face.shape.len() != 2 {
        return Err(Error::msg(format!("face_mesh_client - expected a 2-d landmark tensor, got shape {:?}", face.shape)))
    }
    let rows = usize::try_from(face.shape[0])?;
    let cols = usize::try_from(face.shape[1])?;

    let values = match face.datatype.as_str() {
        "FP32" => u8_to_f32_vec(&face.raw_contents),
        other => {
            return Err(Error::msg(format!("face_mesh_client - unsupported landmark datatype {}", other)))
        }
    };

    let arr = Array2::from_shape_vec((rows, cols), values)?;
    convert_ndarray_to_landmarks(arr.view())
}

#[async_trait]
impl LandmarkProvider for FaceMeshClient {
    async fn detect(&self, image: &DecodedImage) -> Result<Option<LandmarkSet>, Error> {
        let response = self.infer(self.build_request(image)).await?;
        debug!("face mesh returned {} face(s)", response.faces.len());

        match response.faces.first() {
            None => Ok(None),
            Some(face) => parse_face(face).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use prost::Message;
    use crate::config::config::FaceMeshConfig;
    use crate::modules::face_mesh_client::facemesh::{DetectLandmarksResponse, FaceLandmarks};
    use crate::modules::face_mesh_client::{parse_face, FaceMeshClient};
    use crate::modules::landmark_provider::LandmarkProvider;
    use crate::utils::coordinate::Coordinate2D;
    use crate::utils::image::DecodedImage;

    fn fp32_face(shape: Vec<i64>, values: &[f32]) -> FaceLandmarks {
        FaceLandmarks {
            shape,
            datatype: "FP32".to_string(),
            raw_contents: values.iter().flat_map(|v| v.to_le_bytes()).collect(),
        }
    }

    #[test]
    fn test_parse_face_with_depth() {
        let face = fp32_face(vec![2, 3], &[0.25, 0.5, 0.0, 0.75, 0.125, 0.01]);
        let set = parse_face(&face).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(1), Some(&Coordinate2D::new(0.75, 0.125)));
    }

    #[test]
    fn test_parse_face_shape_mismatch() {
        let face = fp32_face(vec![478, 3], &[0.25, 0.5, 0.0]);
        assert!(parse_face(&face).is_err());
    }

    #[test]
    fn test_parse_face_rejects_other_datatypes() {
        let mut face = fp32_face(vec![1, 2], &[0.25, 0.5]);
        face.datatype = "FP16".to_string();
        assert!(parse_face(&face).is_err());
    }

    #[test]
    fn test_parse_face_rejects_negative_dims() {
        let face = fp32_face(vec![-1, 2], &[0.25, 0.5]);
        assert!(parse_face(&face).is_err());
    }

    #[test]
    fn test_response_wire_roundtrip() {
        let response = DetectLandmarksResponse { faces: vec![fp32_face(vec![1, 2], &[0.1, 0.2])] };
        let bytes = response.encode_to_vec();
        let decoded = DetectLandmarksResponse::decode(bytes.as_slice()).unwrap();
        assert_eq!(decoded, response);
    }

    #[tokio::test]
    async fn test_build_request_carries_image() {
        let client = FaceMeshClient::new(FaceMeshConfig::default()).unwrap();
        let image = DecodedImage::new(vec![1, 2, 3, 4, 5, 6], 2, 1);
        let request = client.build_request(&image);
        assert_eq!(request.model_name, "face_mesh");
        assert_eq!((request.width, request.height, request.channels), (2, 1, 3));
        assert_eq!(request.max_faces, 1);
        assert!(request.refine_landmarks);
        assert_eq!(request.image, image.pixels);
    }

    #[tokio::test]
    async fn test_invalid_endpoint() {
        let mut config = FaceMeshConfig::default();
        config.endpoint = "not a uri".to_string();
        assert!(FaceMeshClient::new(config).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_an_error() {
        let mut config = FaceMeshConfig::default();
        config.endpoint = "http://127.0.0.1:1".to_string();
        config.timeout = 2;
        let client = FaceMeshClient::new(config).unwrap();
        let image = DecodedImage::new(vec![0; 12], 2, 2);
        assert!(client.detect(&image).await.is_err());
    }
}
