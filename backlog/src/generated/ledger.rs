/// / A record read from the ledger.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RecordMessage {
    /// / The message text.
    #[prost(string, required, tag="1")]
    pub value: ::prost::alloc::string::String,
    /// / Arrival time, whole seconds since the unix epoch.
    #[prost(int64, required, tag="2")]
    pub seconds: i64,
    /// / Arrival time, nanoseconds past `seconds`.
    #[prost(uint32, required, tag="3")]
    pub nanos: u32,
    /// / The record's offset.
    #[prost(int64, required, tag="4")]
    pub offset: i64,
}
/// / Request for the latest available offset.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LatestOffsetRequest {
}
/// / The latest available offset, absent if nothing has arrived yet.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LatestOffsetResponse {
    #[prost(int64, optional, tag="1")]
    pub offset: ::core::option::Option<i64>,
}
/// / Request for every record in (start, end].
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RangeRequest {
    /// / Exclusive lower bound. Absent means from the beginning.
    #[prost(int64, optional, tag="1")]
    pub start: ::core::option::Option<i64>,
    /// / Inclusive upper bound.
    #[prost(int64, required, tag="2")]
    pub end: i64,
}
/// Generated client implementations.
pub mod ledger_api_client {
    #![allow(unused_variables, dead_code, missing_docs, clippy::let_unit_value)]
    use tonic::codegen::*;
    use tonic::codegen::http::Uri;
    //// Allows consumers to read batches of records by offset.
    #[derive(Debug, Clone)]
    pub struct LedgerApiClient<T> {
        inner: tonic::client::Grpc<T>,
    }
    impl LedgerApiClient<tonic::transport::Channel> {
        /// Attempt to create a new client by connecting to a given endpoint.
        pub async fn connect<D>(dst: D) -> Result<Self, tonic::transport::Error>
        where
            D: std::convert::TryInto<tonic::transport::Endpoint>,
            D::Error: Into<StdError>,
        {
            let conn = tonic::transport::Endpoint::new(dst)?.connect().await?;
            Ok(Self::new(conn))
        }
    }
    impl<T> LedgerApiClient<T>
    where
        T: tonic::client::GrpcService<tonic::body::BoxBody>,
        T::Error: Into<StdError>,
        T::ResponseBody: Body<Data = Bytes> + Send + 'static,
        <T::ResponseBody as Body>::Error: Into<StdError> + Send,
    {
        pub fn new(inner: T) -> Self {
            let inner = tonic::client::Grpc::new(inner);
            Self { inner }
        }
        pub fn with_origin(inner: T, origin: Uri) -> Self {
            let inner = tonic::client::Grpc::with_origin(inner, origin);
            Self { inner }
        }
        pub fn with_interceptor<F>(
            inner: T,
            interceptor: F,
        ) -> LedgerApiClient<InterceptedService<T, F>>
        where
            F: tonic::service::Interceptor,
            T::ResponseBody: Default,
            T: tonic::codegen::Service<
                http::Request<tonic::body::BoxBody>,
                Response = http::Response<
                    <T as tonic::client::GrpcService<tonic::body::BoxBody>>::ResponseBody,
                >,
            >,
            <T as tonic::codegen::Service<
                http::Request<tonic::body::BoxBody>,
            >>::Error: Into<StdError> + Send + Sync,
        {
            LedgerApiClient::new(InterceptedService::new(inner, interceptor))
        }
        /// Compress requests with the given encoding.
        ///
        /// This requires the server to support it otherwise it might respond with an
        /// error.
        #[must_use]
        pub fn send_compressed(mut self, encoding: CompressionEncoding) -> Self {
            self.inner = self.inner.send_compressed(encoding);
            self
        }
        /// Enable decompressing responses.
        #[must_use]
        pub fn accept_compressed(mut self, encoding: CompressionEncoding) -> Self {
            self.inner = self.inner.accept_compressed(encoding);
            self
        }
        //// Get the latest offset which can be read.
        pub async fn latest_offset(
            &mut self,
            request: impl tonic::IntoRequest<super::LatestOffsetRequest>,
        ) -> Result<
            tonic::Response<super::LatestOffsetResponse>,
            tonic::Status,
        > {
            self.inner
                .ready()
                .await
                .map_err(|e| {
                    tonic::Status::new(
                        tonic::Code::Unknown,
                        format!("Service was not ready: {}", e.into()),
                    )
                })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(
                "/ledger.LedgerApi/LatestOffset",
            );
            self.inner.unary(request.into_request(), path, codec).await
        }
        //// Stream every record in a range, in offset order.
        pub async fn read_range(
            &mut self,
            request: impl tonic::IntoRequest<super::RangeRequest>,
        ) -> Result<
            tonic::Response<
                tonic::codec::Streaming<super::RecordMessage>,
            >,
            tonic::Status,
        > {
            self.inner
                .ready()
                .await
                .map_err(|e| {
                    tonic::Status::new(
                        tonic::Code::Unknown,
                        format!("Service was not ready: {}", e.into()),
                    )
                })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(
                "/ledger.LedgerApi/ReadRange",
            );
            self.inner.server_streaming(request.into_request(), path, codec).await
        }
    }
}
/// Generated server implementations.
pub mod ledger_api_server {
    #![allow(unused_variables, dead_code, missing_docs, clippy::let_unit_value)]
    use tonic::codegen::*;
    ///Generated trait containing gRPC methods that should be implemented for use with LedgerApiServer.
    #[async_trait]
    pub trait LedgerApi: Send + Sync + 'static {
        //// Get the latest offset which can be read.
        async fn latest_offset(
            &self,
            request: tonic::Request<super::LatestOffsetRequest>,
        ) -> Result<tonic::Response<super::LatestOffsetResponse>, tonic::Status>;
        ///Server streaming response type for the ReadRange method.
        type ReadRangeStream: futures_core::Stream<
                Item = Result<super::RecordMessage, tonic::Status>,
            >
            + Send
            + 'static;
        //// Stream every record in a range, in offset order.
        async fn read_range(
            &self,
            request: tonic::Request<super::RangeRequest>,
        ) -> Result<tonic::Response<Self::ReadRangeStream>, tonic::Status>;
    }
    //// Allows consumers to read batches of records by offset.
    #[derive(Debug)]
    pub struct LedgerApiServer<T: LedgerApi> {
        inner: _Inner<T>,
        accept_compression_encodings: EnabledCompressionEncodings,
        send_compression_encodings: EnabledCompressionEncodings,
    }
    struct _Inner<T>(Arc<T>);
    impl<T: LedgerApi> LedgerApiServer<T> {
        pub fn new(inner: T) -> Self {
            Self::from_arc(Arc::new(inner))
        }
        pub fn from_arc(inner: Arc<T>) -> Self {
            let inner = _Inner(inner);
            Self {
                inner,
                accept_compression_encodings: Default::default(),
                send_compression_encodings: Default::default(),
            }
        }
        pub fn with_interceptor<F>(
            inner: T,
            interceptor: F,
        ) -> InterceptedService<Self, F>
        where
            F: tonic::service::Interceptor,
        {
            InterceptedService::new(Self::new(inner), interceptor)
        }
        /// Enable decompressing requests with the given encoding.
        #[must_use]
        pub fn accept_compressed(mut self, encoding: CompressionEncoding) -> Self {
            self.accept_compression_encodings.enable(encoding);
            self
        }
        /// Compress responses with the given encoding, if the client supports it.
        #[must_use]
        pub fn send_compressed(mut self, encoding: CompressionEncoding) -> Self {
            self.send_compression_encodings.enable(encoding);
            self
        }
    }
    impl<T, B> tonic::codegen::Service<http::Request<B>> for LedgerApiServer<T>
    where
        T: LedgerApi,
        B: Body + Send + 'static,
        B::Error: Into<StdError> + Send + 'static,
    {
        type Response = http::Response<tonic::body::BoxBody>;
        type Error = std::convert::Infallible;
        type Future = BoxFuture<Self::Response, Self::Error>;
        fn poll_ready(
            &mut self,
            _cx: &mut Context<'_>,
        ) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }
        fn call(&mut self, req: http::Request<B>) -> Self::Future {
            let inner = self.inner.clone();
            match req.uri().path() {
                "/ledger.LedgerApi/LatestOffset" => {
                    #[allow(non_camel_case_types)]
                    struct LatestOffsetSvc<T: LedgerApi>(pub Arc<T>);
                    impl<
                        T: LedgerApi,
                    > tonic::server::UnaryService<super::LatestOffsetRequest>
                    for LatestOffsetSvc<T> {
                        type Response = super::LatestOffsetResponse;
                        type Future = BoxFuture<
                            tonic::Response<Self::Response>,
                            tonic::Status,
                        >;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::LatestOffsetRequest>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).latest_offset(request).await };
                            Box::pin(fut)
                        }
                    }
                    let accept_compression_encodings = self.accept_compression_encodings;
                    let send_compression_encodings = self.send_compression_encodings;
                    let inner = self.inner.clone();
                    let fut = async move {
                        let inner = inner.0;
                        let method = LatestOffsetSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec)
                            .apply_compression_config(
                                accept_compression_encodings,
                                send_compression_encodings,
                            );
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/ledger.LedgerApi/ReadRange" => {
                    #[allow(non_camel_case_types)]
                    struct ReadRangeSvc<T: LedgerApi>(pub Arc<T>);
                    impl<
                        T: LedgerApi,
                    > tonic::server::ServerStreamingService<super::RangeRequest>
                    for ReadRangeSvc<T> {
                        type Response = super::RecordMessage;
                        type ResponseStream = T::ReadRangeStream;
                        type Future = BoxFuture<
                            tonic::Response<Self::ResponseStream>,
                            tonic::Status,
                        >;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::RangeRequest>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).read_range(request).await };
                            Box::pin(fut)
                        }
                    }
                    let accept_compression_encodings = self.accept_compression_encodings;
                    let send_compression_encodings = self.send_compression_encodings;
                    let inner = self.inner.clone();
                    let fut = async move {
                        let inner = inner.0;
                        let method = ReadRangeSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec)
                            .apply_compression_config(
                                accept_compression_encodings,
                                send_compression_encodings,
                            );
                        let res = grpc.server_streaming(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                _ => {
                    Box::pin(async move {
                        Ok(
                            http::Response::builder()
                                .status(200)
                                .header("grpc-status", "12")
                                .header("content-type", "application/grpc")
                                .body(empty_body())
                                .unwrap(),
                        )
                    })
                }
            }
        }
    }
    impl<T: LedgerApi> Clone for LedgerApiServer<T> {
        fn clone(&self) -> Self {
            let inner = self.inner.clone();
            Self {
                inner,
                accept_compression_encodings: self.accept_compression_encodings,
                send_compression_encodings: self.send_compression_encodings,
            }
        }
    }
    impl<T: LedgerApi> Clone for _Inner<T> {
        fn clone(&self) -> Self {
            Self(self.0.clone())
        }
    }
    impl<T: std::fmt::Debug> std::fmt::Debug for _Inner<T> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:?}", self.0)
        }
    }
    impl<T: LedgerApi> tonic::server::NamedService for LedgerApiServer<T> {
        const NAME: &'static str = "ledger.LedgerApi";
    }
}
