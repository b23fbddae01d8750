use courier_core::api::{InputEncryptedFile, InputFile, SecretFileEncryptionKey};
use futures_util::StreamExt;
use tracing::warn;

use crate::error::{UploadError, UploadResult};
use crate::transport::{BoxStream, TransportEvent, UploadRequest, UploadTransport};

/// Terminal result of one resource upload
#[derive(Debug, Clone, PartialEq)]
pub enum UploadedResource {
    Plain(InputFile),
    Secret {
        file: InputEncryptedFile,
        size: i32,
        key: SecretFileEncryptionKey,
    },
}

/// Transport events in pipeline vocabulary
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceUploadEvent {
    Progress(f32),
    Uploaded(UploadedResource),
}

/// Start one upload and normalize its events.
///
/// Every transport failure becomes [`UploadError::Failed`]. No retries happen
/// here. The stream ends after the first terminal item.
pub fn upload_resource(
    transport: &dyn UploadTransport,
    request: UploadRequest,
) -> BoxStream<UploadResult<ResourceUploadEvent>> {
    let resource = request.resource.id();
    let mut events = transport.upload(request);

    Box::pin(async_stream::stream! {
        while let Some(event) = events.next().await {
            match event {
                Ok(TransportEvent::Progress(progress)) => {
                    yield Ok(ResourceUploadEvent::Progress(progress));
                }
                Ok(TransportEvent::InputFile(file)) => {
                    yield Ok(ResourceUploadEvent::Uploaded(UploadedResource::Plain(file)));
                    return;
                }
                Ok(TransportEvent::InputSecretFile { file, size, key }) => {
                    yield Ok(ResourceUploadEvent::Uploaded(UploadedResource::Secret {
                        file,
                        size,
                        key,
                    }));
                    return;
                }
                Err(err) => {
                    warn!(resource = %resource, error = %err, "Transport upload failed");
                    yield Err(UploadError::failed(err.to_string()));
                    return;
                }
            }
        }
    })
}
