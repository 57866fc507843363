use crate::net::{status_text_for, RequestParts, Response};

// Issues the request and returns the buffered response in a result if any
pub async fn fetch(client: &reqwest::Client, request: &RequestParts) -> Result<Response, reqwest::Error> {
    let mut builder = client
        .request(request.method.clone(), &request.url)
        .headers(request.headers.clone());
    if let Some(body) = &request.body {
        builder = builder.body(body.clone());
    }
    let res = builder.send().await?;

    // Fetch results
    let final_url = res.url().to_string();
    let status = res.status().as_u16();
    let headers = res.headers().clone();

    // Fetch body. We don't do streaming yet
    let response_text = res.text().await?;

    Ok(Response {
        url: final_url,
        status: Some(status),
        status_text: status_text_for(Some(status)),
        headers,
        response_text,
        timed_out: false,
    })
}
