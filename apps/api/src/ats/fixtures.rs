//! Shared test documents.

use serde_json::{json, Value};

use crate::models::resume::ResumeDocument;

pub fn sample_resume_json() -> Value {
    json!({
        "sections": [
            {"type": "header", "content": {
                "name": "Jane Doe",
                "email": "jane.doe@example.com",
                "phone": "(555) 123-4567",
                "location": "Austin, TX"
            }},
            {"type": "summary", "title": "Summary", "content": {"text":
                "Backend software engineer with six years of experience building reliable APIs and cloud services in Rust and Python. Led migrations to Kubernetes and mentored engineers across three product teams."
            }},
            {"type": "experience", "title": "Experience", "content": {"items": [
                {
                    "position": "Senior Software Engineer",
                    "company": "Acme Corp",
                    "startDate": "Jan 2021",
                    "endDate": "Present",
                    "bullets": [
                        "Led the migration of 14 services to Kubernetes, cutting deploy time by 60%",
                        "Built a Rust ingestion API handling 20k requests per second on AWS",
                        "Reduced cloud spend by $250k per year through autoscaling and caching work",
                        "Mentored 5 engineers through code review, testing and architecture sessions"
                    ]
                },
                {
                    "position": "Software Engineer",
                    "company": "Beta Labs",
                    "startDate": "Jun 2018",
                    "endDate": "Dec 2020",
                    "bullets": [
                        "Designed REST microservices in Python and Docker for the billing platform",
                        "Automated CI/CD pipelines with Git hooks, raising release frequency 3x",
                        "Improved SQL query latency by 45% for the reporting dashboard users"
                    ]
                }
            ]}},
            {"type": "education", "title": "Education", "content": {"items": [
                {"title": "B.S. Computer Science", "name": "University of Texas", "date": "2018"}
            ]}},
            {"type": "skills", "title": "Skills", "content": {"items": [
                "Rust", "Python", "SQL", "AWS", "Docker", "Kubernetes", "Git", "REST"
            ]}}
        ],
        "customization": {"fontFamily": "Calibri", "fontSize": 11}
    })
}

pub fn sample_resume() -> ResumeDocument {
    serde_json::from_value(sample_resume_json()).unwrap()
}
